//! Venue Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type VenueId = RecordId;

/// Venue entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<VenueId>,
    pub name: String,
    pub address: Option<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Create venue payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueCreate {
    pub name: String,
    pub address: Option<String>,
}

/// Update venue payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
