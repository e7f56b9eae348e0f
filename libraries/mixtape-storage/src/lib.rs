//! Mixtape Storage
//!
//! `SQLite` persistence for users, mixtapes, and login sessions.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries (`users`,
//!   `playlists`, `sessions`)
//! - **Single Contract**: `LocalStorageContext` exposes the slices through
//!   the `MixtapeStorage` trait from `mixtape-core`
//! - **Atomic Counters**: view counts only change through a single `UPDATE`
//!
//! # Example
//!
//! ```rust,no_run
//! use mixtape_storage::{connect, LocalStorageContext};
//! use mixtape_core::MixtapeStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = connect("sqlite://mixtape.db").await?;
//! let storage = LocalStorageContext::new(pool);
//!
//! let public = storage.list_public_playlists().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod playlists;
pub mod sessions;
pub mod users;

pub use context::LocalStorageContext;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://mixtape.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        // Concurrent view increments queue on the write lock instead of failing
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create a pool and bring its schema up to date
pub async fn connect(database_url: &str) -> Result<SqlitePool, StorageError> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Milliseconds since the epoch, the on-disk timestamp format
pub(crate) fn to_millis(ts: chrono::DateTime<chrono::Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> mixtape_core::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| mixtape_core::MixtapeError::storage(format!("Invalid timestamp: {ms}")))
}
