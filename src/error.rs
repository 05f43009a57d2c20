// Error types for the plugin list generator.
// Covers index API failures, cache I/O and malformed release data.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginListError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine a user cache directory")]
    NoCacheDir,

    #[error("Invalid upload time: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, PluginListError>;
