//! User accounts keyed by external identity

use crate::{from_millis, to_millis};
use chrono::Utc;
use mixtape_core::{error::Result, types::*};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        external_id: row.try_get("external_id")?,
        display_name: row.try_get("display_name")?,
        created_at: from_millis(row.try_get("created_at")?)?,
    })
}

/// Find the user for an external identity, inserting it on first sight.
///
/// The insert is a no-op when the external id already exists, so two
/// concurrent first logins still resolve to one row.
pub async fn find_or_create(pool: &SqlitePool, profile: &ExternalProfile) -> Result<User> {
    sqlx::query(
        r#"
        INSERT INTO users (id, external_id, display_name, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(external_id) DO NOTHING
        "#,
    )
    .bind(UserId::generate())
    .bind(&profile.id)
    .bind(&profile.display_name)
    .bind(to_millis(Utc::now()))
    .execute(pool)
    .await?;

    let row = sqlx::query(
        "SELECT id, external_id, display_name, created_at FROM users WHERE external_id = ?",
    )
    .bind(&profile.id)
    .fetch_one(pool)
    .await?;

    user_from_row(&row)
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, external_id, display_name, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(
        "SELECT id, external_id, display_name, created_at FROM users ORDER BY display_name",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(user_from_row).collect()
}
