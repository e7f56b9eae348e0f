/// Playlist ("mixtape") domain types
use crate::types::{PlaylistId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry on a tape side.
///
/// The value is whatever the client sent, usually a video search result
/// carrying `id.videoId` and `snippet.title`. The server never interprets it
/// beyond link-key matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRef(Value);

impl TrackRef {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The video id of a search-result shaped reference
    pub fn video_id(&self) -> Option<&str> {
        self.0
            .get("id")
            .and_then(|id| id.get("videoId"))
            .and_then(Value::as_str)
    }

    /// Whether this entry is identified by `key`.
    ///
    /// Matches on full value equality, or, for a string key, on the video id.
    pub fn is_identified_by(&self, key: &TrackRef) -> bool {
        if self == key {
            return true;
        }
        match key.as_value() {
            Value::String(s) => self.video_id() == Some(s.as_str()),
            _ => false,
        }
    }
}

impl From<Value> for TrackRef {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A stored mixtape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,

    /// Owner; not checked against the users table
    pub user_id: UserId,

    pub a_side_links: Vec<TrackRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_side_links: Option<Vec<TrackRef>>,

    /// Opaque styling/state blob chosen by the client
    #[serde(default)]
    pub tape_deck: Value,

    pub tape_label: String,

    pub is_public: bool,

    pub views: u64,

    pub created_at: DateTime<Utc>,
}

/// Data required to store a new mixtape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylist {
    pub user_id: UserId,
    pub a_side_links: Vec<TrackRef>,
    #[serde(default)]
    pub b_side_links: Option<Vec<TrackRef>>,
    #[serde(default)]
    pub tape_deck: Value,
    #[serde(default)]
    pub tape_label: String,
    #[serde(default)]
    pub is_public: bool,
}

/// Partial update applied by the playlist owner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylist {
    #[serde(default)]
    pub a_side_links: Option<Vec<TrackRef>>,
    #[serde(default)]
    pub b_side_links: Option<Vec<TrackRef>>,
    #[serde(default)]
    pub tape_deck: Option<Value>,
    #[serde(default)]
    pub tape_label: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl UpdatePlaylist {
    pub fn is_empty(&self) -> bool {
        self.a_side_links.is_none()
            && self.b_side_links.is_none()
            && self.tape_deck.is_none()
            && self.tape_label.is_none()
            && self.is_public.is_none()
    }
}

/// How to locate a single playlist
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistFilter {
    /// Primary key lookup
    Id(PlaylistId),

    /// Linear scan for the first playlist whose A side holds the key.
    ///
    /// An array key, or a string holding a serialized array, also matches an
    /// A side equal to it as a whole.
    ASideContains(TrackRef),
}

impl PlaylistFilter {
    pub fn matches(&self, playlist: &Playlist) -> bool {
        match self {
            PlaylistFilter::Id(id) => &playlist.id == id,
            PlaylistFilter::ASideContains(key) => a_side_contains(&playlist.a_side_links, key),
        }
    }
}

fn a_side_contains(a_side: &[TrackRef], key: &TrackRef) -> bool {
    if a_side.iter().any(|track| track.is_identified_by(key)) {
        return true;
    }

    match key.as_value() {
        Value::Array(items) => side_equals(items, a_side),
        // A whole side serialized to a JSON string
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => side_equals(&items, a_side),
            _ => false,
        },
        _ => false,
    }
}

fn side_equals(items: &[Value], a_side: &[TrackRef]) -> bool {
    items.len() == a_side.len()
        && items.iter().zip(a_side).all(|(item, track)| item == track.as_value())
}
