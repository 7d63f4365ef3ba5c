//! Sync API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::SyncStatus;

/// GET /api/sync/status - 资源版本快照
///
/// epoch 变化表示服务器重启过，客户端应全量重新拉取。
pub async fn status(State(state): State<ServerState>) -> AppResult<Json<SyncStatus>> {
    Ok(Json(state.sync_status()))
}
