//! Catalog sources, wire format and caching

pub mod api;
pub mod cache;
pub mod config;
pub mod sources;

use dex_core::FetchError;
use thiserror::Error;

// Re-exports
pub use cache::{CachedSource, DataCache};
pub use config::load_settings;
pub use sources::{HttpSource, JsonDirSource, MemorySource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server answered with status {0}")]
    Status(u16),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<DataError> for FetchError {
    fn from(error: DataError) -> Self {
        match error {
            DataError::Json(e) => FetchError::Malformed(e.to_string()),
            other => FetchError::Unavailable(other.to_string()),
        }
    }
}
