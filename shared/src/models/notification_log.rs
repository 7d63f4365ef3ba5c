//! Notification Log Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a reservation notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyStatus {
    /// Webhook call went out without a transport error
    Sent,
    /// The reservation had no valid platform identity; no call made
    Skipped,
    /// Webhook call confirmed failed (network/timeout)
    Failed,
}

impl fmt::Display for NotifyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyStatus::Sent => write!(f, "sent"),
            NotifyStatus::Skipped => write!(f, "skipped"),
            NotifyStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Append-only audit record, one per reservation-creation attempt.
///
/// Entries are never deleted. The single permitted mutation is the
/// sent→failed status correction when the webhook call is confirmed
/// to have failed after the entry was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLogEntry {
    pub id: String,
    pub timestamp: i64,
    #[serde(default)]
    pub external_id: String,
    pub client_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: NotifyStatus,
    pub operator: String,
}
