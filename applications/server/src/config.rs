/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_search")]
    pub search: SearchSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Built single-page UI served for every unmatched GET
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Where uploaded recordings are written
    #[serde(default = "default_audio_path")]
    pub audio_path: PathBuf,

    /// Bundled mp3 sound effects served by `/soundFile/:file`
    #[serde(default = "default_sound_path")]
    pub sound_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    /// Signs session cookies
    #[serde(default)]
    pub session_secret: String,

    #[serde(default = "default_session_expiration_hours")]
    pub session_expiration_hours: u64,

    /// Mark cookies `Secure`; enable behind HTTPS
    #[serde(default)]
    pub secure_cookies: bool,

    #[serde(default)]
    pub google_client_id: String,

    #[serde(default)]
    pub google_client_secret: String,

    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,

    #[serde(default = "default_google_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_google_token_url")]
    pub token_url: String,

    #[serde(default = "default_google_userinfo_url")]
    pub userinfo_url: String,

    /// Where the browser lands after a successful login
    #[serde(default = "default_success_redirect")]
    pub success_redirect: String,

    /// Where the browser lands after a failed login
    #[serde(default = "default_failure_redirect")]
    pub failure_redirect: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl ServerConfig {
    /// Load configuration from file and environment.
    ///
    /// Reads `path` when given, otherwise `config.toml` if present, then
    /// applies `MIXTAPE_<SECTION>__<KEY>` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MIXTAPE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.session_secret.is_empty() {
            return Err(ServerError::Config(
                "Session secret is required (set MIXTAPE_AUTH__SESSION_SECRET)".to_string(),
            ));
        }

        if self.auth.session_expiration_hours == 0 {
            return Err(ServerError::Config(
                "Session expiration must be at least one hour".to_string(),
            ));
        }

        if self.auth.google_client_id.is_empty() || self.auth.google_client_secret.is_empty() {
            tracing::warn!("Google OAuth credentials are not set; login will fail");
        }

        if self.search.api_key.is_empty() {
            tracing::warn!("YouTube API key is not set; search requests will be rejected upstream");
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        web_dir: default_web_dir(),
        max_upload_bytes: default_max_upload_bytes(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("./dist")
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        audio_path: default_audio_path(),
        sound_path: default_sound_path(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/mixtape.db".to_string()
}

fn default_audio_path() -> PathBuf {
    PathBuf::from("./server/audio")
}

fn default_sound_path() -> PathBuf {
    PathBuf::from("./sound")
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        session_secret: String::new(),
        session_expiration_hours: default_session_expiration_hours(),
        secure_cookies: false,
        google_client_id: String::new(),
        google_client_secret: String::new(),
        redirect_url: default_redirect_url(),
        auth_url: default_google_auth_url(),
        token_url: default_google_token_url(),
        userinfo_url: default_google_userinfo_url(),
        success_redirect: default_success_redirect(),
        failure_redirect: default_failure_redirect(),
    }
}

fn default_session_expiration_hours() -> u64 {
    24 * 7
}

fn default_redirect_url() -> String {
    "http://localhost:3000/auth/google/callback".to_string()
}

fn default_google_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_google_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_google_userinfo_url() -> String {
    "https://www.googleapis.com/oauth2/v2/userinfo".to_string()
}

fn default_success_redirect() -> String {
    "/mixtape-player".to_string()
}

fn default_failure_redirect() -> String {
    "/login".to_string()
}

fn default_search() -> SearchSettings {
    SearchSettings {
        api_key: String::new(),
        base_url: default_search_base_url(),
        max_results: default_max_results(),
    }
}

fn default_search_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_max_results() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            search: default_search(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.auth.failure_redirect, "/login");
        assert_eq!(config.storage.audio_path, PathBuf::from("./server/audio"));
    }

    #[test]
    fn test_validate_requires_session_secret() {
        let mut config = ServerConfig::default();
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        config.auth.session_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixtape.toml");
        std::fs::write(
            &path,
            r#"
            [server]
            port = 4100

            [auth]
            session_secret = "from-file"

            [search]
            max_results = 5
            "#,
        )
        .unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.auth.session_secret, "from-file");
        assert_eq!(config.search.max_results, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.storage.database_url, "sqlite://./data/mixtape.db");
    }
}
