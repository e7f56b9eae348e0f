/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::session::OAUTH_STATE_COOKIE,
    state::AppState,
};
use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Set by the provider when the user denied access
    #[serde(default)]
    pub error: Option<String>,
}

/// GET /auth/google
pub async fn google_login(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let request = app_state.identity.authorization_url();
    let jar = jar.add(app_state.sessions.oauth_state_cookie(request.state));

    (jar, Redirect::to(&request.url))
}

/// GET /auth/google/callback
///
/// Always answers with a redirect: to the success page with a fresh session
/// cookie, or to the login page with nothing created.
pub async fn google_callback(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(app_state.sessions.oauth_state_removal_cookie());

    match complete_login(&app_state, params, expected_state).await {
        Ok(cookie) => (jar.add(cookie), Redirect::to(&app_state.login.success)),
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            (jar, Redirect::to(&app_state.login.failure))
        }
    }
}

async fn complete_login(
    app_state: &AppState,
    params: CallbackParams,
    expected_state: Option<String>,
) -> Result<Cookie<'static>> {
    if let Some(error) = params.error {
        return Err(ServerError::Identity(format!("Provider returned {}", error)));
    }

    let code = params
        .code
        .ok_or_else(|| ServerError::Identity("Missing authorization code".to_string()))?;

    match (params.state, expected_state) {
        (Some(state), Some(expected)) if state == expected => {}
        _ => return Err(ServerError::Identity("State mismatch".to_string())),
    }

    let profile = app_state.identity.verify(&code).await?;
    let user = app_state.db.find_or_create_user(&profile).await?;
    let session = app_state
        .db
        .create_session(&user.id, app_state.sessions.expires_at())
        .await?;
    let token = app_state.sessions.issue(&user, &session)?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(app_state.sessions.session_cookie(token))
}

/// GET /user/
///
/// The session user, or `null` when anonymous.
pub async fn current_user(user: Option<AuthenticatedUser>) -> Json<Option<AuthenticatedUser>> {
    Json(user)
}

/// GET /logout
pub async fn logout(
    State(app_state): State<AppState>,
    user: Option<AuthenticatedUser>,
    jar: CookieJar,
) -> Result<(CookieJar, &'static str)> {
    if let Some(user) = user {
        app_state.db.delete_session(&user.session_id).await?;
        tracing::info!(user_id = %user.id, "User logged out");
    }

    Ok((jar.remove(app_state.sessions.removal_cookie()), "logged out"))
}
