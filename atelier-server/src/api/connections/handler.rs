//! Connection API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::connection;
use crate::utils::{AppError, AppResult};
use shared::models::{Contact, InboundConnection};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindRequest {
    pub contact_id: String,
}

/// GET /api/connections - 全部连接（最新在前）
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<InboundConnection>>> {
    let connections = connection::find_all(state.store.as_ref()).await?;
    Ok(Json(connections))
}

/// GET /api/connections/pending - 待处理收件箱
///
/// 未绑定且 externalId 未被任何客户认领的连接。
pub async fn pending(State(state): State<ServerState>) -> AppResult<Json<Vec<InboundConnection>>> {
    let inbox = state.reconcile.pending_inbox().await?;
    Ok(Json(inbox))
}

/// POST /api/connections/:id/bind - 绑定到既有客户
///
/// 已绑定的连接返回 409。
pub async fn bind(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BindRequest>,
) -> AppResult<Json<Contact>> {
    if payload.contact_id.is_empty() {
        return Err(AppError::validation("contactId must not be empty"));
    }

    let bound = state.reconcile.bind(&id, &payload.contact_id).await?;
    broadcast_bind(&state, &id, &bound, "updated").await;
    Ok(Json(bound))
}

/// POST /api/connections/:id/quick-create - 快速建档并绑定
///
/// 以连接的 displayName 合成新客户。非幂等：重复调用返回 409，
/// 因为首次调用已将连接认领。
pub async fn quick_create(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Contact>> {
    let created = state.reconcile.quick_create_and_bind(&id).await?;
    broadcast_bind(&state, &id, &created, "created").await;
    Ok(Json(created))
}

/// 绑定类操作改了两个文档，两边都要广播
async fn broadcast_bind(
    state: &ServerState,
    connection_id: &str,
    contact: &Contact,
    contact_action: &str,
) {
    state.broadcast_sync(
        "contact",
        contact_action,
        &contact.id,
        serde_json::to_value(contact).ok(),
    );
    match connection::find_by_id(state.store.as_ref(), connection_id).await {
        Ok(Some(conn)) => {
            state.broadcast_sync(
                "connection",
                "updated",
                connection_id,
                serde_json::to_value(&conn).ok(),
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(connection_id, error = %e, "Post-bind connection read failed");
            state.broadcast_sync("connection", "updated", connection_id, None);
        }
    }
}
