/// Shared application state
use crate::services::{IdentityProvider, LoginRedirects, RecordingStorage, SearchProxy, SessionService};
use mixtape_core::MixtapeStorage;
use std::{path::PathBuf, sync::Arc};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn MixtapeStorage>,
    pub sessions: Arc<SessionService>,
    pub identity: Arc<dyn IdentityProvider>,
    pub recordings: Arc<RecordingStorage>,
    pub search: Arc<SearchProxy>,
    pub login: Arc<LoginRedirects>,
    /// Built single-page UI
    pub web_dir: PathBuf,
}

impl AppState {
    pub fn new(
        db: Arc<dyn MixtapeStorage>,
        sessions: Arc<SessionService>,
        identity: Arc<dyn IdentityProvider>,
        recordings: Arc<RecordingStorage>,
        search: Arc<SearchProxy>,
        login: Arc<LoginRedirects>,
        web_dir: PathBuf,
    ) -> Self {
        Self {
            db,
            sessions,
            identity,
            recordings,
            search,
            login,
            web_dir,
        }
    }
}
