use crate::{playlists, sessions, users};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mixtape_core::{error::Result, storage::MixtapeStorage, types::*};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
#[derive(Debug, Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MixtapeStorage for LocalStorageContext {
    // Users
    async fn find_or_create_user(&self, profile: &ExternalProfile) -> Result<User> {
        users::find_or_create(&self.pool, profile).await
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        users::get_by_id(&self.pool, id).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }

    // Playlists
    async fn store_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist> {
        playlists::create(&self.pool, playlist).await
    }

    async fn retrieve_playlist(&self, filter: &PlaylistFilter) -> Result<Option<Playlist>> {
        playlists::retrieve(&self.pool, filter).await
    }

    async fn list_all_playlists(&self) -> Result<Vec<Playlist>> {
        playlists::get_all(&self.pool).await
    }

    async fn list_public_playlists(&self) -> Result<Vec<Playlist>> {
        playlists::get_public(&self.pool).await
    }

    async fn list_user_playlists(&self, user_id: &UserId) -> Result<Vec<Playlist>> {
        playlists::get_by_user(&self.pool, user_id).await
    }

    async fn increment_views(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        playlists::increment_views(&self.pool, id).await
    }

    async fn update_playlist(
        &self,
        id: &PlaylistId,
        owner: &UserId,
        update: UpdatePlaylist,
    ) -> Result<Option<Playlist>> {
        playlists::update(&self.pool, id, owner, update).await
    }

    // Sessions
    async fn create_session(&self, user_id: &UserId, expires_at: DateTime<Utc>) -> Result<Session> {
        let purged = sessions::delete_expired(&self.pool, Utc::now()).await?;
        if purged > 0 {
            tracing::debug!(purged, "Removed expired sessions");
        }
        sessions::create(&self.pool, user_id, expires_at).await
    }

    async fn get_live_session(&self, id: &SessionId) -> Result<Option<Session>> {
        sessions::get_live(&self.pool, id, Utc::now()).await
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        sessions::delete(&self.pool, id).await
    }
}
