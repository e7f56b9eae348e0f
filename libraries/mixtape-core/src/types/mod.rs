mod ids;
mod playlist;
mod session;
mod user;

pub use ids::{PlaylistId, SessionId, UserId};
pub use playlist::{CreatePlaylist, Playlist, PlaylistFilter, TrackRef, UpdatePlaylist};
pub use session::Session;
pub use user::{ExternalProfile, User};
