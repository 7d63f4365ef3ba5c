//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResult`] - 处理器 Result 别名
//!
//! # 错误码规范
//!
//! | 错误码 | 分类 |
//! |--------|------|
//! | E0002 | 验证失败 |
//! | E0003 | 资源不存在 |
//! | E0004 | 资源冲突 |
//! | E0006 | 无效请求 |
//! | E9001 | 内部错误 |
//! | E9002 | 存储错误 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::StoreError;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Conflict: {0}")]
    /// 资源冲突 (409) — 例如重复绑定已认领的连接
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Invalid request: {0}")]
    /// 无效请求 (400)
    Invalid(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Store error: {0}")]
    /// 存储错误 (500) — 对外部平台的读写失败
    Store(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

/// 处理器的 Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),
            AppError::Store(msg) => {
                error!(target: "store", error = %msg, "Store error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Store error")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(ErrorBody {
            code: code.to_string(),
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::PreconditionFailed(msg) => AppError::Conflict(msg),
            StoreError::Backend(msg) => AppError::Store(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
