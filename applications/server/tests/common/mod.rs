//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use mixtape_core::{ExternalProfile, MixtapeStorage, User};
use mixtape_server::{
    config::ServerConfig,
    create_router,
    services::identity::AuthorizationRequest,
    IdentityProvider, LoginRedirects, RecordingStorage, SearchProxy, ServerError, SessionService,
};
use mixtape_server::state::AppState;
use mixtape_storage::LocalStorageContext;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-secret-key";
pub const MULTIPART_BOUNDARY: &str = "mixtape-test-boundary";

pub mod fixtures {
    pub const OAUTH_STATE: &str = "fixed-state";
    pub const AUTHORIZE_URL: &str = "https://idp.test/authorize?state=fixed-state";
    pub const GOOD_CODE: &str = "good-code";
    pub const EXTERNAL_ID: &str = "google-1";
    pub const DISPLAY_NAME: &str = "Test User";
    pub const INDEX_HTML: &str = "<html>mixtape</html>";
}

/// Identity provider that accepts exactly one authorization code
pub struct MockIdentity;

#[async_trait]
impl IdentityProvider for MockIdentity {
    fn authorization_url(&self) -> AuthorizationRequest {
        AuthorizationRequest {
            url: fixtures::AUTHORIZE_URL.to_string(),
            state: fixtures::OAUTH_STATE.to_string(),
        }
    }

    async fn verify(&self, code: &str) -> mixtape_server::Result<ExternalProfile> {
        if code == fixtures::GOOD_CODE {
            Ok(ExternalProfile {
                id: fixtures::EXTERNAL_ID.to_string(),
                display_name: fixtures::DISPLAY_NAME.to_string(),
            })
        } else {
            Err(ServerError::Identity("invalid_grant".to_string()))
        }
    }
}

/// A router over a real SQLite file, with recordings, sound files and the
/// web UI in a temp directory
pub struct TestApp {
    pub router: Router,
    pub db: Arc<LocalStorageContext>,
    pub sessions: Arc<SessionService>,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_search_url("http://127.0.0.1:9".to_string()).await
    }

    pub async fn with_search_url(search_url: String) -> Self {
        let dir = TempDir::new().unwrap();

        let db_url = format!("sqlite://{}", dir.path().join("test.db").display());
        let pool = mixtape_storage::connect(&db_url).await.unwrap();
        let db = Arc::new(LocalStorageContext::new(pool));

        let sound_dir = dir.path().join("sound");
        std::fs::create_dir_all(&sound_dir).unwrap();
        std::fs::write(sound_dir.join("click.mp3"), b"ID3 click").unwrap();

        let web_dir = dir.path().join("web");
        std::fs::create_dir_all(web_dir.join("assets")).unwrap();
        std::fs::write(web_dir.join("index.html"), fixtures::INDEX_HTML).unwrap();
        std::fs::write(web_dir.join("assets").join("app.js"), "console.log('tape');").unwrap();

        let recordings = RecordingStorage::new(dir.path().join("audio"), sound_dir);
        recordings.initialize().await.unwrap();

        let mut config = ServerConfig::default();
        config.search.api_key = "test-key".to_string();
        config.search.base_url = search_url;

        let sessions = Arc::new(SessionService::new(TEST_SECRET.to_string(), 1, false));

        let app_state = AppState::new(
            db.clone(),
            sessions.clone(),
            Arc::new(MockIdentity),
            Arc::new(recordings),
            Arc::new(SearchProxy::new(&config.search)),
            Arc::new(LoginRedirects {
                success: config.auth.success_redirect.clone(),
                failure: config.auth.failure_redirect.clone(),
            }),
            web_dir,
        );

        Self {
            router: create_router(app_state, config.server.max_upload_bytes),
            db,
            sessions,
            dir,
        }
    }

    /// Log a user in directly and return the `Cookie` header value
    pub async fn login_as(&self, external_id: &str, display_name: &str) -> (User, String) {
        let user = self
            .db
            .find_or_create_user(&ExternalProfile {
                id: external_id.to_string(),
                display_name: display_name.to_string(),
            })
            .await
            .unwrap();
        let session = self
            .db
            .create_session(&user.id, self.sessions.expires_at())
            .await
            .unwrap();
        let token = self.sessions.issue(&user, &session).unwrap();

        (user, format!("mixtape_session={}", token))
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::util::ServiceExt;
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// A `multipart/form-data` upload with a single file field
pub fn post_multipart(uri: &str, field: &str, data: &[u8], cookie: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"blob\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: audio/ogg\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

    let mut builder = Request::builder().uri(uri).method("POST").header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// `name=value` pairs from every `Set-Cookie` header
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(|v| v.trim().to_string())
        .collect()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
