//! Health Check Handler

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::collections;
use crate::utils::AppResult;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub epoch: String,
    pub environment: String,
}

/// GET /health - 健康检查
///
/// 读一次存储确认后端可达，再返回实例信息。
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    state.store.snapshot(collections::CONTACTS).await?;

    Ok(Json(HealthResponse {
        status: "ok",
        epoch: state.epoch.clone(),
        environment: state.config.environment.clone(),
    }))
}
