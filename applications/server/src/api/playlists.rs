/// Playlist ("mixtape") API routes
use crate::{
    api::Lookup,
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use mixtape_core::{
    CreatePlaylist, Playlist, PlaylistFilter, PlaylistId, TrackRef, UpdatePlaylist, UserId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NO_PUBLIC_TAPES: &str = "No public tapes found";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPlaylistsResponse {
    pub response: Vec<Playlist>,
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct PublicPlaylistsResponse {
    pub response: Vec<Playlist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePlaylistRequest {
    /// Only used when the request carries no session
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub a_side_links: Vec<TrackRef>,
    #[serde(default)]
    pub b_side_links: Option<Vec<TrackRef>>,
    #[serde(default)]
    pub tape_deck: Value,
    #[serde(default)]
    pub tape_label: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub id: PlaylistId,
    #[serde(flatten)]
    pub update: UpdatePlaylist,
}

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub key: TrackRef,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: PlaylistId,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistIdRequest {
    pub id: PlaylistId,
}

/// What the player page needs to render a tape
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub a_side: Vec<TrackRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_side: Option<Vec<TrackRef>>,
    pub tape_deck: Value,
    pub tape_label: String,
    pub user_id: UserId,
    pub views: u64,
}

impl From<Playlist> for PlayerResponse {
    fn from(playlist: Playlist) -> Self {
        Self {
            a_side: playlist.a_side_links,
            b_side: playlist.b_side_links,
            tape_deck: playlist.tape_deck,
            tape_label: playlist.tape_label,
            user_id: playlist.user_id,
            views: playlist.views,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub views: u64,
}

/// GET /userPlaylists
pub async fn user_playlists(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserPlaylistsResponse>> {
    let playlists = app_state.db.list_user_playlists(&user.id).await?;

    Ok(Json(UserPlaylistsResponse {
        response: playlists,
        display_name: user.display_name,
    }))
}

/// GET /public
pub async fn public_playlists(
    State(app_state): State<AppState>,
) -> Result<Json<PublicPlaylistsResponse>> {
    let playlists = app_state.db.list_public_playlists().await?;
    let message = playlists.is_empty().then_some(NO_PUBLIC_TAPES);

    Ok(Json(PublicPlaylistsResponse {
        response: playlists,
        message,
    }))
}

/// POST /store
pub async fn store_playlist(
    State(app_state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Json(req): Json<StorePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let user_id = user
        .map(|u| u.id)
        .or(req.user_id)
        .ok_or_else(|| ServerError::Unauthorized("Not logged in".to_string()))?;

    let playlist = app_state
        .db
        .store_playlist(CreatePlaylist {
            user_id,
            a_side_links: req.a_side_links,
            b_side_links: req.b_side_links,
            tape_deck: req.tape_deck,
            tape_label: req.tape_label,
            is_public: req.is_public,
        })
        .await?;

    tracing::info!(playlist_id = %playlist.id, user_id = %playlist.user_id, "Stored playlist");
    Ok((StatusCode::CREATED, Json(playlist)))
}

/// POST /update
///
/// Applies the given fields to a playlist the caller owns.
pub async fn update_playlist(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Lookup<Playlist>> {
    if req.update.is_empty() {
        return Err(ServerError::BadRequest("Nothing to update".to_string()));
    }

    let updated = app_state
        .db
        .update_playlist(&req.id, &user.id, req.update)
        .await?;

    Ok(updated.into())
}

/// POST /getLink
pub async fn get_link(
    State(app_state): State<AppState>,
    Json(req): Json<LinkRequest>,
) -> Result<Lookup<LinkResponse>> {
    let playlist = app_state
        .db
        .retrieve_playlist(&PlaylistFilter::ASideContains(req.key))
        .await?;

    Ok(playlist.map(|p| LinkResponse { id: p.id }).into())
}

/// POST /mixtape-player/
///
/// Counts a view and returns the tape as it is after the increment.
pub async fn mixtape_player(
    State(app_state): State<AppState>,
    Json(req): Json<PlaylistIdRequest>,
) -> Result<Lookup<PlayerResponse>> {
    let playlist = app_state.db.increment_views(&req.id).await?;

    Ok(playlist.map(PlayerResponse::from).into())
}

/// POST /new-view
pub async fn new_view(
    State(app_state): State<AppState>,
    Json(req): Json<PlaylistIdRequest>,
) -> Result<Lookup<ViewsResponse>> {
    let playlist = app_state.db.increment_views(&req.id).await?;

    Ok(playlist.map(|p| ViewsResponse { views: p.views }).into())
}
