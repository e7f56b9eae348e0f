/// Core error types for Mixtape
use thiserror::Error;

/// Result type alias using `MixtapeError`
pub type Result<T> = std::result::Result<T, MixtapeError>;

/// Core error type for Mixtape
#[derive(Error, Debug)]
pub enum MixtapeError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl MixtapeError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for MixtapeError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
