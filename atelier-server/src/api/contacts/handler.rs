//! Contact API Handlers

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use http::header;
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{connection, contact};
use crate::utils::{AppError, AppResult, csv};
use shared::models::{Contact, ContactCreate, ContactUpdate};

const RESOURCE: &str = "contact";

/// GET /api/contacts - 获取所有客户（按创建时间降序）
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Contact>>> {
    let contacts = contact::find_all(state.store.as_ref()).await?;
    Ok(Json(contacts))
}

/// GET /api/contacts/:id - 获取单个客户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Contact>> {
    let found = contact::find_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Contact {id}")))?;
    Ok(Json(found))
}

/// POST /api/contacts - 创建客户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ContactCreate>,
) -> AppResult<Json<Contact>> {
    payload.validate()?;

    let created = contact::create(state.store.as_ref(), payload).await?;
    state.broadcast_sync(
        RESOURCE,
        "created",
        &created.id,
        serde_json::to_value(&created).ok(),
    );
    Ok(Json(created))
}

/// PUT /api/contacts/:id - 更新客户（部分字段）
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ContactUpdate>,
) -> AppResult<Json<Contact>> {
    if let Some(name) = &payload.name {
        if name.is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
    }

    let updated = contact::update(state.store.as_ref(), &id, payload).await?;
    state.broadcast_sync(
        RESOURCE,
        "updated",
        &id,
        serde_json::to_value(&updated).ok(),
    );
    Ok(Json(updated))
}

/// DELETE /api/contacts/:id - 删除客户（不级联）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let removed = state.reconcile.delete_contact(&id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Contact {id}")));
    }
    state.broadcast_sync(RESOURCE, "deleted", &id, None);
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// POST /api/contacts/:id/unlink - 解绑聊天平台身份
///
/// 对应连接回到待处理收件箱。
pub async fn unlink(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Contact>> {
    let before = contact::find_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Contact {id}")))?;
    let released_external_id = before.external_id;

    let unlinked = state.reconcile.unlink(&id).await?;
    state.broadcast_sync(
        RESOURCE,
        "updated",
        &id,
        serde_json::to_value(&unlinked).ok(),
    );

    // 被释放的连接也要通知客户端刷新收件箱
    if !released_external_id.is_empty() {
        if let Some(conn) =
            connection::find_by_external_id(state.store.as_ref(), &released_external_id).await?
        {
            state.broadcast_sync(
                "connection",
                "updated",
                &conn.id,
                serde_json::to_value(&conn).ok(),
            );
        }
    }
    Ok(Json(unlinked))
}

/// GET /api/contacts/export - 导出客户 CSV
///
/// 带 UTF-8 BOM；城市/行政区列由地址解析器填充。
pub async fn export(State(state): State<ServerState>) -> AppResult<impl IntoResponse> {
    let contacts = contact::find_all(state.store.as_ref()).await?;
    let body = csv::export_contacts(&contacts, state.config.timezone);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"contacts.csv\"",
            ),
        ],
        body,
    ))
}
