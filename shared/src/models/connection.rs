//! Inbound Connection Model

use serde::{Deserialize, Serialize};

/// Raw chat-platform handshake awaiting reconciliation to a contact.
///
/// Created by the external platform integration whenever a new user
/// interacts with the official account; never deleted here. `is_bound`
/// flips to `true` exactly once, when reconciliation claims it (an
/// explicit unlink releases it again).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundConnection {
    /// Platform-assigned id
    pub id: String,
    /// `U`-prefixed platform user token
    pub external_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub is_bound: bool,
    /// First-seen time (Unix millis). Required on the wire — documents
    /// missing it are treated as malformed and skipped.
    pub timestamp: i64,
    /// Marketing attribution tag, empty when the platform delivered
    /// the handshake before the landing page recorded a source
    #[serde(default)]
    pub source: String,
    /// The user blocked the official account
    #[serde(default)]
    pub is_blocked: bool,
}
