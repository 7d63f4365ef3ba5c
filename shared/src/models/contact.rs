//! Contact Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// CRM contact (客户), possibly linked to a chat-platform identity.
///
/// A contact is "linked" when `external_id` carries the platform's
/// `U`-prefixed user token; an empty string means unlinked. Optional
/// wire fields are modelled as empty strings rather than `Option`
/// because the legacy documents store `""`, never null.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    /// Site / project address, free text
    #[serde(default)]
    pub address: String,
    /// Chat-platform user id (`U` + hex token), empty when unlinked
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub external_display_name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: i64,
}

/// Create contact payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "phone too long"))]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update contact payload (partial; absent fields are left untouched)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tags: Option<Vec<String>>,
}
