//! Reservation Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Scheduled appointment (预约).
///
/// `kind` is an enum-like free string on the wire; the values the
/// front office uses today are 諮詢 / 丈量 / 看圖 / 簽約, but the server
/// does not restrict the set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub contact_id: String,
    pub customer_name: String,
    /// Copied from the bound contact at creation time; may be empty
    #[serde(default)]
    pub external_id: String,
    /// Local date-time string, e.g. "2026-09-03 14:30"
    pub date_time: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notified: bool,
    pub created_at: i64,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreate {
    #[validate(length(min = 1, message = "contactId must not be empty"))]
    pub contact_id: String,
    #[validate(length(min = 1, message = "customerName must not be empty"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "dateTime must not be empty"))]
    pub date_time: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: String,
}
