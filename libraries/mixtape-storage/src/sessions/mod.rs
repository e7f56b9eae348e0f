//! Server-side login sessions

use crate::{from_millis, to_millis};
use chrono::{DateTime, Utc};
use mixtape_core::{error::Result, types::*};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn session_from_row(row: &SqliteRow) -> Result<Session> {
    Ok(Session {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        created_at: from_millis(row.try_get("created_at")?)?,
        expires_at: from_millis(row.try_get("expires_at")?)?,
    })
}

/// Open a new session
pub async fn create(
    pool: &SqlitePool,
    user_id: &UserId,
    expires_at: DateTime<Utc>,
) -> Result<Session> {
    let session = Session {
        id: SessionId::generate(),
        user_id: user_id.clone(),
        created_at: Utc::now(),
        expires_at,
    };

    sqlx::query("INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(to_millis(session.created_at))
        .bind(to_millis(session.expires_at))
        .execute(pool)
        .await?;

    Ok(session)
}

/// Get a session that has not expired at `now`
pub async fn get_live(
    pool: &SqlitePool,
    id: &SessionId,
    now: DateTime<Utc>,
) -> Result<Option<Session>> {
    let row = sqlx::query(
        "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ? AND expires_at > ?",
    )
    .bind(id)
    .bind(to_millis(now))
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(session_from_row).transpose()
}

/// Delete a session (idempotent)
pub async fn delete(pool: &SqlitePool, id: &SessionId) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Remove every session that expired before `now`, returning how many went
pub async fn delete_expired(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(to_millis(now))
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
