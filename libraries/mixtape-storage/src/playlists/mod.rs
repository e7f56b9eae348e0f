//! Mixtape storage and retrieval
//!
//! Track sides and the tape deck blob are kept as JSON text and decoded on
//! read. Views change only through `increment_views`, which is a single
//! `UPDATE ... RETURNING` statement.

use crate::{from_millis, to_millis};
use chrono::Utc;
use mixtape_core::{error::Result, types::*, MixtapeError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    let a_side: String = row.try_get("a_side_links")?;
    let b_side: Option<String> = row.try_get("b_side_links")?;
    let tape_deck: String = row.try_get("tape_deck")?;
    let views: i64 = row.try_get("views")?;

    Ok(Playlist {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        a_side_links: serde_json::from_str(&a_side)?,
        b_side_links: b_side.as_deref().map(serde_json::from_str).transpose()?,
        tape_deck: serde_json::from_str(&tape_deck)?,
        tape_label: row.try_get("tape_label")?,
        is_public: row.try_get::<i64, _>("is_public")? != 0,
        views: u64::try_from(views)
            .map_err(|_| MixtapeError::storage(format!("Negative view count: {views}")))?,
        created_at: from_millis(row.try_get("created_at")?)?,
    })
}

/// Store a new playlist with zero views
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let a_side = serde_json::to_string(&playlist.a_side_links)?;
    let b_side = playlist
        .b_side_links
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let tape_deck = serde_json::to_string(&playlist.tape_deck)?;

    let row = sqlx::query(
        r#"
        INSERT INTO playlists
            (id, user_id, a_side_links, b_side_links, tape_deck, tape_label, is_public, views, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?)
        RETURNING id, user_id, a_side_links, b_side_links, tape_deck, tape_label,
                  is_public, views, created_at
        "#,
    )
    .bind(PlaylistId::generate())
    .bind(&playlist.user_id)
    .bind(a_side)
    .bind(b_side)
    .bind(tape_deck)
    .bind(&playlist.tape_label)
    .bind(playlist.is_public)
    .bind(to_millis(Utc::now()))
    .fetch_one(pool)
    .await?;

    playlist_from_row(&row)
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, a_side_links, b_side_links, tape_deck, tape_label,
               is_public, views, created_at
        FROM playlists
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(playlist_from_row).transpose()
}

/// Find a single playlist by id or by A-side link key
pub async fn retrieve(pool: &SqlitePool, filter: &PlaylistFilter) -> Result<Option<Playlist>> {
    match filter {
        PlaylistFilter::Id(id) => get_by_id(pool, id).await,
        PlaylistFilter::ASideContains(_) => scan(pool, filter).await,
    }
}

/// Linear scan in creation order; the oldest match wins when several
/// playlists share a key.
async fn scan(pool: &SqlitePool, filter: &PlaylistFilter) -> Result<Option<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, a_side_links, b_side_links, tape_deck, tape_label,
               is_public, views, created_at
        FROM playlists
        ORDER BY created_at, rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    for row in &rows {
        let playlist = playlist_from_row(row)?;
        if filter.matches(&playlist) {
            return Ok(Some(playlist));
        }
    }

    Ok(None)
}

/// Get all playlists, newest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, a_side_links, b_side_links, tape_deck, tape_label,
               is_public, views, created_at
        FROM playlists
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(playlist_from_row).collect()
}

/// Get all public playlists, newest first
pub async fn get_public(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, a_side_links, b_side_links, tape_deck, tape_label,
               is_public, views, created_at
        FROM playlists
        WHERE is_public = 1
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(playlist_from_row).collect()
}

/// Get a user's playlists, newest first
pub async fn get_by_user(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, a_side_links, b_side_links, tape_deck, tape_label,
               is_public, views, created_at
        FROM playlists
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(playlist_from_row).collect()
}

/// Add one view and return the playlist as it is after the increment
pub async fn increment_views(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        UPDATE playlists
        SET views = views + 1
        WHERE id = ?
        RETURNING id, user_id, a_side_links, b_side_links, tape_deck, tape_label,
                  is_public, views, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(playlist_from_row).transpose()
}

/// Apply the provided fields of `update` to a playlist owned by `owner`.
///
/// Returns `None` when the playlist is missing or owned by someone else.
pub async fn update(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner: &UserId,
    update: UpdatePlaylist,
) -> Result<Option<Playlist>> {
    let a_side = update
        .a_side_links
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let b_side = update
        .b_side_links
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let tape_deck = update
        .tape_deck
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let row = sqlx::query(
        r#"
        UPDATE playlists
        SET a_side_links = COALESCE(?, a_side_links),
            b_side_links = COALESCE(?, b_side_links),
            tape_deck = COALESCE(?, tape_deck),
            tape_label = COALESCE(?, tape_label),
            is_public = COALESCE(?, is_public)
        WHERE id = ? AND user_id = ?
        RETURNING id, user_id, a_side_links, b_side_links, tape_deck, tape_label,
                  is_public, views, created_at
        "#,
    )
    .bind(a_side)
    .bind(b_side)
    .bind(tape_deck)
    .bind(update.tape_label)
    .bind(update.is_public)
    .bind(id)
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(playlist_from_row).transpose()
}
