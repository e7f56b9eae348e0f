/// Session middleware
use crate::{error::ServerError, services::session::SESSION_COOKIE, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use mixtape_core::{SessionId, UserId};
use serde::Serialize;

/// The user behind the current request's session.
///
/// Use as an extractor: `AuthenticatedUser` rejects anonymous requests with
/// 401, `Option<AuthenticatedUser>` lets them through.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub display_name: String,
    #[serde(skip)]
    pub session_id: SessionId,
}

/// Resolve the session cookie into an `AuthenticatedUser` extension.
///
/// Never rejects: a missing, forged, expired or revoked session simply leaves
/// the request anonymous.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(user) = resolve(&state, cookie.value()).await {
            request.extensions_mut().insert(user);
        }
    }

    next.run(request).await
}

async fn resolve(state: &AppState, token: &str) -> Option<AuthenticatedUser> {
    let claims = match state.sessions.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Ignoring invalid session cookie: {}", e);
            return None;
        }
    };

    let session = match state.db.get_live_session(&claims.session_id()).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            tracing::debug!(session_id = %claims.sid, "Session expired or revoked");
            return None;
        }
        Err(e) => {
            tracing::error!("Failed to look up session: {}", e);
            return None;
        }
    };

    if session.user_id != claims.user_id() {
        tracing::warn!(session_id = %claims.sid, "Session cookie names a different user");
        return None;
    }

    Some(AuthenticatedUser {
        id: session.user_id,
        display_name: claims.name,
        session_id: session.id,
    })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Unauthorized("Not logged in".to_string()))
    }
}
