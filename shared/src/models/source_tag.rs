//! Source Attribution Model

use serde::{Deserialize, Serialize};

/// Best-effort `externalId → source` mapping written by the
/// join/redirect landing page, usually before the chat platform
/// delivers its own connection record. Used only to backfill `source`
/// on connections that arrived without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTag {
    pub id: String,
    pub external_id: String,
    pub source: String,
    pub created_at: i64,
}
