/// ID types for Mixtape entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declares a string-backed identifier with UUID generation and, when the
/// `sqlx-support` feature is on, SQLite encode/decode impls.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as sqlx::Type<sqlx::Sqlite>>::type_info()
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                args: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as sqlx::Encode<sqlx::Sqlite>>::encode_by_ref(&self.0, args)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                Ok(Self(s))
            }
        }
    };
}

string_id!(
    /// Local user identifier
    UserId
);

string_id!(
    /// Playlist identifier, the sharable key of a mixtape
    PlaylistId
);

string_id!(
    /// Server-side login session identifier
    SessionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(UserId::generate(), UserId::generate());
        assert_ne!(PlaylistId::generate(), PlaylistId::generate());
    }

    #[test]
    fn playlist_id_display() {
        let id = PlaylistId::new("playlist-456");
        assert_eq!(format!("{}", id), "playlist-456");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&UserId::new("u1")).unwrap();
        assert_eq!(json, "\"u1\"");

        let id: SessionId = serde_json::from_str("\"s-9\"").unwrap();
        assert_eq!(id.as_str(), "s-9");
    }
}
