//! Mixtape Server Library
//!
//! Backend for sharing mixtapes: Google login with server-side sessions,
//! playlist storage and view counting, recording uploads, and a video
//! search proxy, plus the built web UI.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::{
    GoogleIdentityProvider, IdentityProvider, LoginRedirects, RecordingStorage, SearchProxy,
    SessionService,
};
pub use state::AppState;
