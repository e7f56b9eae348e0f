/// HTTP routing
use crate::{
    api,
    middleware::{self, AuthenticatedUser},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header, Method, Request, StatusCode},
    middleware as axum_middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    routing::post,
    Router,
};
use std::path::Path;
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Landing page for `/`
const HOME: &str = "/mixtape-player";

pub fn create_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    let auth_routes = Router::new()
        .route("/auth/google", get(api::auth::google_login))
        .route("/auth/google/callback", get(api::auth::google_callback))
        .route("/user", get(api::auth::current_user))
        .route("/user/", get(api::auth::current_user))
        .route("/logout", get(api::auth::logout));

    let playlist_routes = Router::new()
        .route("/userPlaylists", get(api::playlists::user_playlists))
        .route("/public", get(api::playlists::public_playlists))
        .route("/store", post(api::playlists::store_playlist))
        .route("/update", post(api::playlists::update_playlist))
        .route("/getLink", post(api::playlists::get_link))
        // GET is the player page itself
        .route(
            "/mixtape-player/",
            get(spa_fallback).post(api::playlists::mixtape_player),
        )
        .route("/new-view", post(api::playlists::new_view));

    let media_routes = Router::new()
        .route("/upload", post(api::recordings::upload))
        .route("/recording", post(api::recordings::recording))
        .route("/soundFile/:file", get(api::recordings::sound_file))
        .route("/search", post(api::search::search));

    Router::new()
        .route("/health", get(api::health::health))
        .route("/", get(|| async { Redirect::to(HOME) }))
        .route("/create-mixtapes", get(create_mixtapes))
        .merge(auth_routes)
        .merge(playlist_routes)
        .merge(media_routes)
        .fallback(spa_fallback)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::session_middleware,
        ))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// GET /create-mixtapes - only for logged-in users
async fn create_mixtapes(
    State(app_state): State<AppState>,
    user: Option<AuthenticatedUser>,
    req: Request<Body>,
) -> Response {
    if user.is_none() {
        return Redirect::to(&app_state.login.failure).into_response();
    }
    spa_fallback(State(app_state), req).await
}

/// Serve a file from the web UI directory, or `index.html` so the
/// client-side router can handle the path.
async fn spa_fallback(State(app_state): State<AppState>, req: Request<Body>) -> Response {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return StatusCode::NOT_FOUND.into_response();
    }

    let web_dir = &app_state.web_dir;

    // Try to serve the file directly
    let path = req.uri().path().trim_start_matches('/');
    let file_path = web_dir.join(path);

    if !path.is_empty() && file_path.is_file() {
        match ServeDir::new(web_dir).oneshot(req).await {
            Ok(res) => res.into_response(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    } else {
        serve_index(web_dir).await
    }
}

async fn serve_index(web_dir: &Path) -> Response {
    let index_path = web_dir.join("index.html");
    match tokio::fs::read(&index_path).await {
        Ok(contents) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            contents,
        )
            .into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // No web UI available
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => {
            tracing::error!("Failed to read {:?}: {}", index_path, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
