use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskboardError>;

#[derive(Debug, Error)]
pub enum TaskboardError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid storage key: {0}")]
    InvalidStorageKey(String),

    #[error("Board invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
