//! Storage trait for the persistence adapter

use crate::error::Result;
use crate::types::{
    CreatePlaylist, ExternalProfile, Playlist, PlaylistFilter, PlaylistId, Session, SessionId,
    UpdatePlaylist, User, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence operations used by the server.
///
/// Absence is always `Ok(None)`; `Err` is reserved for an unreachable or
/// failing store.
#[async_trait]
pub trait MixtapeStorage: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Return the user with `profile.id` as external id, inserting it first
    /// if absent
    async fn find_or_create_user(&self, profile: &ExternalProfile) -> Result<User>;

    /// Get user by ID
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Get all users
    async fn get_all_users(&self) -> Result<Vec<User>>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Insert a playlist with zero views
    async fn store_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist>;

    /// Find a single playlist
    async fn retrieve_playlist(&self, filter: &PlaylistFilter) -> Result<Option<Playlist>>;

    /// Every stored playlist, newest first
    async fn list_all_playlists(&self) -> Result<Vec<Playlist>>;

    /// All playlists flagged public
    async fn list_public_playlists(&self) -> Result<Vec<Playlist>>;

    /// All playlists owned by `user_id`
    async fn list_user_playlists(&self, user_id: &UserId) -> Result<Vec<Playlist>>;

    /// Atomically add one view and return the updated playlist
    async fn increment_views(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Apply `update` if `id` exists and belongs to `owner`
    async fn update_playlist(
        &self,
        id: &PlaylistId,
        owner: &UserId,
        update: UpdatePlaylist,
    ) -> Result<Option<Playlist>>;

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Open a session for `user_id` valid until `expires_at`
    async fn create_session(&self, user_id: &UserId, expires_at: DateTime<Utc>)
        -> Result<Session>;

    /// Get a session that exists and has not expired
    async fn get_live_session(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Delete a session; deleting a missing session is not an error
    async fn delete_session(&self, id: &SessionId) -> Result<()>;
}
