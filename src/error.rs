use thiserror::Error;

/// Errors that can occur while listing files from a source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("rate limited by remote service: {message}")]
    RateLimited { message: String },

    #[error("invalid remote structure: {message}")]
    InvalidStructure { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache error: {message}")]
    Cache { message: String },

    #[error("backend error: {message}")]
    Backend { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for listing operations
pub type Result<T> = std::result::Result<T, SourceError>;
