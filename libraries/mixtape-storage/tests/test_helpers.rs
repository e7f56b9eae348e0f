//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so that migrations and concurrent writers behave as in production.

#![allow(dead_code)]

use mixtape_core::types::*;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = mixtape_storage::connect(&db_url)
            .await
            .expect("Failed to open test database");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Fixture: a search-result shaped track reference
pub fn track(video_id: &str, title: &str) -> TrackRef {
    TrackRef::from(json!({
        "id": { "videoId": video_id },
        "snippet": { "title": title }
    }))
}

/// Fixture: playlist details with the given owner, A side, and visibility
pub fn new_tape(user_id: &str, a_side: Vec<Value>, is_public: bool) -> CreatePlaylist {
    CreatePlaylist {
        user_id: UserId::new(user_id),
        a_side_links: a_side.into_iter().map(TrackRef::from).collect(),
        b_side_links: None,
        tape_deck: json!({ "deck": "classic" }),
        tape_label: "Test Tape".to_string(),
        is_public,
    }
}

/// Fixture: store a playlist and return it
pub async fn create_test_playlist(pool: &SqlitePool, details: CreatePlaylist) -> Playlist {
    mixtape_storage::playlists::create(pool, details)
        .await
        .expect("Failed to create test playlist")
}
