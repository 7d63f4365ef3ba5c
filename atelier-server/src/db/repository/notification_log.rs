//! Notification Log Repository
//!
//! Append-only: entries are written once per reservation-creation
//! attempt and never deleted. The only mutation is the sent→failed
//! status correction after a confirmed webhook failure.

use serde_json::json;
use shared::models::{NotificationLogEntry, NotifyStatus};

use super::{RepoResult, decode_all, encode};
use crate::db::{DataStore, collections};

/// 全部通知日志，按时间降序
pub async fn find_all(store: &dyn DataStore) -> RepoResult<Vec<NotificationLogEntry>> {
    let docs = store.snapshot(collections::NOTIFICATION_LOGS).await?;
    let mut entries: Vec<NotificationLogEntry> = decode_all(collections::NOTIFICATION_LOGS, docs);
    entries.sort_by_key(|e| std::cmp::Reverse(e.timestamp));
    Ok(entries)
}

pub async fn append(store: &dyn DataStore, entry: &NotificationLogEntry) -> RepoResult<()> {
    store
        .put(collections::NOTIFICATION_LOGS, &entry.id, encode(entry)?, false)
        .await
}

pub async fn set_status(store: &dyn DataStore, id: &str, status: NotifyStatus) -> RepoResult<()> {
    store
        .update(
            collections::NOTIFICATION_LOGS,
            id,
            json!({ "status": status }),
        )
        .await
}
