/// Storage-specific errors
use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for mixtape_core::MixtapeError {
    fn from(err: StorageError) -> Self {
        mixtape_core::MixtapeError::storage(err.to_string())
    }
}
