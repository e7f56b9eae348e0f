/// Video search route
use crate::{
    error::Result,
    services::search::UpstreamResponse,
    state::AppState,
};
use axum::{extract::State, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// POST /search
pub async fn search(
    State(app_state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<UpstreamResponse> {
    app_state.search.search(&req.query).await
}
