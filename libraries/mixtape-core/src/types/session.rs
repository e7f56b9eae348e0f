/// Login session domain type
use crate::types::{SessionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-side record backing a session cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let session = Session {
            id: SessionId::generate(),
            user_id: UserId::new("u1"),
            created_at: now - Duration::hours(1),
            expires_at: now,
        };

        assert!(session.is_expired_at(now));
        assert!(!session.is_expired_at(now - Duration::seconds(1)));
    }
}
