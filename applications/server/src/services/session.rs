/// Session service - signed session cookies
use crate::error::{Result, ServerError};
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mixtape_core::{Session, SessionId, User, UserId};
use serde::{Deserialize, Serialize};

/// Cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "mixtape_session";

/// Cookie carrying the CSRF state of a login in progress
pub const OAUTH_STATE_COOKIE: &str = "mixtape_oauth_state";

/// Upper bound on session lifetime (ten years)
const MAX_SESSION_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct SessionService {
    secret: String,
    expiration: Duration,
    secure_cookies: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // User ID
    pub sid: String, // Server-side session ID
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.sub.clone())
    }

    pub fn session_id(&self) -> SessionId {
        SessionId::new(self.sid.clone())
    }
}

/// Post-login destinations
#[derive(Debug, Clone)]
pub struct LoginRedirects {
    pub success: String,
    pub failure: String,
}

impl SessionService {
    pub fn new(secret: String, expiration_hours: u64, secure_cookies: bool) -> Self {
        Self {
            secret,
            expiration: Duration::hours(
                i64::try_from(expiration_hours)
                    .unwrap_or(MAX_SESSION_HOURS)
                    .min(MAX_SESSION_HOURS),
            ),
            secure_cookies,
        }
    }

    /// Expiry for a session opened now
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc::now() + self.expiration
    }

    /// Sign a token naming `session`, valid until the session expires
    pub fn issue(&self, user: &User, session: &Session) -> Result<String> {
        if session.user_id != user.id {
            return Err(ServerError::Internal(
                "Session does not belong to user".to_string(),
            ));
        }

        let claims = SessionClaims {
            sub: user.id.as_str().to_string(),
            sid: session.id.as_str().to_string(),
            name: user.display_name.clone(),
            exp: session.expires_at.timestamp(),
            iat: session.created_at.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }

    /// Verify signature and expiry of a session token
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Cookie that stores `token` for the whole site
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .build()
    }

    /// Cookie that clears the session cookie when removed from a jar
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE).path("/").build()
    }

    /// Cookie holding the login state, only sent back to `/auth` routes
    pub fn oauth_state_cookie(&self, state: String) -> Cookie<'static> {
        Cookie::build((OAUTH_STATE_COOKIE, state))
            .path("/auth")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .build()
    }

    pub fn oauth_state_removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(OAUTH_STATE_COOKIE).path("/auth").build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_and_session(service: &SessionService) -> (User, Session) {
        let user = User {
            id: UserId::new("user-123"),
            external_id: "google-1".to_string(),
            display_name: "Alice".to_string(),
            created_at: Utc::now(),
        };
        let session = Session {
            id: SessionId::generate(),
            user_id: user.id.clone(),
            created_at: Utc::now(),
            expires_at: service.expires_at(),
        };
        (user, session)
    }

    #[test]
    fn test_token_round_trip() {
        let service = SessionService::new("secret".to_string(), 24, false);
        let (user, session) = user_and_session(&service);

        let token = service.issue(&user, &session).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.user_id(), user.id);
        assert_eq!(claims.session_id(), session.id);
        assert_eq!(claims.name, "Alice");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let service = SessionService::new("secret".to_string(), 24, false);
        let other = SessionService::new("other-secret".to_string(), 24, false);
        let (user, session) = user_and_session(&service);

        let token = service.issue(&user, &session).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = SessionService::new("secret".to_string(), 24, false);
        let (user, mut session) = user_and_session(&service);
        session.expires_at = Utc::now() - Duration::hours(1);

        let token = service.issue(&user, &session).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_session_for_other_user_is_not_signed() {
        let service = SessionService::new("secret".to_string(), 24, false);
        let (user, mut session) = user_and_session(&service);
        session.user_id = UserId::new("someone-else");

        assert!(service.issue(&user, &session).is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let service = SessionService::new("secret".to_string(), 24, true);
        let cookie = service.session_cookie("token".to_string());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
