pub mod movie;
pub mod watch_entry;

pub use movie::{MovieDetail, MovieSummary};
pub use watch_entry::{Keyed, WatchEntry};
