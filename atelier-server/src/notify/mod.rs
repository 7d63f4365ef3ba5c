//! 预约通知触发器
//!
//! 预约创建后决定是否调用外部 webhook，并且无论结果如何都先落
//! 一条审计日志。日志先行：外部调用前状态已持久化，webhook 确认
//! 失败后把该条目修正为 failed（这是对旧行为"吞掉失败"的刻意
//! 修正，外层拿到显式的 [`NotifyStatus`] 自行决定升级策略）。

pub mod webhook;

pub use webhook::{WebhookClient, WebhookError};

use std::sync::Arc;

use shared::models::{NotificationLogEntry, NotifyStatus, Reservation};
use shared::util::{now_millis, record_id};

use crate::db::DataStore;
use crate::db::repository::{notification_log, reservation};
use crate::utils::AppResult;

/// A reservation qualifies for notification iff it carries a platform
/// identity: non-empty and `U`-prefixed.
pub fn evaluate(external_id: &str) -> bool {
    !external_id.is_empty() && external_id.starts_with('U')
}

#[derive(Clone)]
pub struct NotifyService {
    store: Arc<dyn DataStore>,
    webhook: WebhookClient,
}

impl NotifyService {
    pub fn new(store: Arc<dyn DataStore>, webhook: WebhookClient) -> Self {
        Self { store, webhook }
    }

    /// 触发预约通知
    ///
    /// 1. 先同步写入日志条目（sent / skipped）——日志写失败即整体
    ///    失败，向调用方上抛
    /// 2. 合格预约再调用 webhook；传输层失败把条目修正为 failed
    /// 3. 发送成功把预约标记为已通知
    ///
    /// 返回最终的日志条目，`status` 即触发结果。
    pub async fn trigger(
        &self,
        reservation_rec: &Reservation,
        operator: &str,
    ) -> AppResult<NotificationLogEntry> {
        let valid = evaluate(&reservation_rec.external_id);
        let mut entry = NotificationLogEntry {
            id: record_id(),
            timestamp: now_millis(),
            external_id: reservation_rec.external_id.clone(),
            client_name: reservation_rec.customer_name.clone(),
            kind: reservation_rec.kind.clone(),
            status: if valid {
                NotifyStatus::Sent
            } else {
                NotifyStatus::Skipped
            },
            operator: operator.to_string(),
        };

        notification_log::append(self.store.as_ref(), &entry).await?;

        if !valid {
            tracing::info!(
                reservation = %reservation_rec.id,
                "Notification skipped: no platform identity"
            );
            return Ok(entry);
        }

        let params = [
            ("externalId", reservation_rec.external_id.as_str()),
            ("clientName", reservation_rec.customer_name.as_str()),
            ("dateTime", reservation_rec.date_time.as_str()),
            ("type", reservation_rec.kind.as_str()),
        ];

        match self.webhook.fire(&params).await {
            Ok(()) => {
                reservation::mark_notified(self.store.as_ref(), &reservation_rec.id).await?;
                Ok(entry)
            }
            Err(e) => {
                tracing::warn!(
                    reservation = %reservation_rec.id,
                    error = %e,
                    "Notification webhook failed"
                );
                entry.status = NotifyStatus::Failed;
                notification_log::set_status(self.store.as_ref(), &entry.id, NotifyStatus::Failed)
                    .await?;
                Ok(entry)
            }
        }
    }
}
