//! Reservation API Handlers

use axum::{
    Json,
    extract::State,
};
use serde::Serialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{contact, notification_log, reservation};
use crate::utils::{AppError, AppResult};
use shared::models::{NotificationLogEntry, Reservation, ReservationCreate};

const RESOURCE: &str = "reservation";

/// 创建响应：预约记录 + 本次通知触发结果
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreated {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub notification: NotificationLogEntry,
}

/// GET /api/reservations - 全部预约（按创建时间降序）
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = reservation::find_all(state.store.as_ref()).await?;
    Ok(Json(reservations))
}

/// POST /api/reservations - 创建预约并触发通知
///
/// externalId 在创建时从客户记录复制；客户未绑定时为空，通知记为
/// skipped。通知结果随响应返回，webhook 失败不影响预约本身创建。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<ReservationCreated>> {
    payload.validate()?;

    let owner = contact::find_by_id(state.store.as_ref(), &payload.contact_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Contact {}", payload.contact_id)))?;

    let created = reservation::create(state.store.as_ref(), payload, owner.external_id).await?;

    let notification = state
        .notify
        .trigger(&created, &state.config.operator_name)
        .await?;

    // notified 标记可能已被触发器更新，重读一次
    let current = reservation::find_by_id(state.store.as_ref(), &created.id)
        .await?
        .unwrap_or(created);

    state.broadcast_sync(
        RESOURCE,
        "created",
        &current.id,
        serde_json::to_value(&current).ok(),
    );

    Ok(Json(ReservationCreated {
        reservation: current,
        notification,
    }))
}

/// GET /api/notification-logs - 通知审计日志（最新在前）
pub async fn notification_logs(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<NotificationLogEntry>>> {
    let logs = notification_log::find_all(state.store.as_ref()).await?;
    Ok(Json(logs))
}
