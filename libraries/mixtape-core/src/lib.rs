//! Mixtape Core
//!
//! Domain types, the storage contract, and error handling shared by the
//! Mixtape storage layer and HTTP server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Playlist`, `Session`, `TrackRef`
//! - **Storage Contract**: the `MixtapeStorage` trait
//! - **Error Handling**: unified `MixtapeError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use mixtape_core::types::{CreatePlaylist, TrackRef, UserId};
//! use serde_json::json;
//!
//! let tape = CreatePlaylist {
//!     user_id: UserId::new("u1"),
//!     a_side_links: vec![TrackRef::from(json!("t1")), TrackRef::from(json!("t2"))],
//!     b_side_links: None,
//!     tape_deck: json!({ "color": "teal" }),
//!     tape_label: "Summer".to_string(),
//!     is_public: true,
//! };
//! assert_eq!(tape.a_side_links.len(), 2);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod types;

pub use error::{MixtapeError, Result};
pub use storage::MixtapeStorage;

pub use types::{
    CreatePlaylist, ExternalProfile, Playlist, PlaylistFilter, PlaylistId, Session, SessionId,
    TrackRef, UpdatePlaylist, User, UserId,
};
