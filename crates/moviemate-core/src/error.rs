use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read slot '{name}' from {path}: {source}")]
    Read {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write slot '{name}' to {path}: {source}")]
    Write {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors a catalog command reports back to its caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The detail's runtime text does not start with a whole number of minutes
    #[error("Cannot read runtime '{runtime}' of {id} as minutes")]
    InvalidDurationFormat { id: String, runtime: String },

    #[error("No movie detail is loaded")]
    NoDetailLoaded,
}
