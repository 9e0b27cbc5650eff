use thiserror::Error;

/// Failures talking to the remote catalog.
///
/// Every variant renders a message fit to show the user as-is.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Could not reach the movie database: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Movie database returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The catalog answered but reported an error of its own
    #[error("{0}")]
    Remote(String),

    #[error("Unexpected response from the movie database: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }
}
