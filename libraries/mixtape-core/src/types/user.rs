/// User domain types
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Local account created on first external login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,

    /// Stable identifier assigned by the identity provider
    pub external_id: String,

    pub display_name: String,

    pub created_at: DateTime<Utc>,
}

/// Identity asserted by the external provider after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalProfile {
    pub id: String,
    pub display_name: String,
}
