use shelfsync_api::ApiError;
use shelfsync_cache::CacheError;
use thiserror::Error;

/// All the ways things can go wrong in shelfsync
#[derive(Error, Debug)]
pub enum Error {
    /// Network, timeout, HTTP status and decode failures, shown to the user as-is
    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error("Cache operation failed: {0}")]
    CacheError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<CacheError> for Error {
    fn from(err: CacheError) -> Self {
        Error::CacheError(err.to_string())
    }
}
