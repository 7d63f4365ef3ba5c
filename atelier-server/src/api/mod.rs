//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`contacts`] - 客户管理（含 CSV 导出与解绑）
//! - [`connections`] - 聊天平台连接（待处理收件箱、绑定、快速建档）
//! - [`reservations`] - 预约与通知日志
//! - [`statistics`] - 营销归因统计
//! - [`sync`] - 资源版本同步状态

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod connections;
pub mod contacts;
pub mod health;
pub mod reservations;
pub mod statistics;
pub mod sync;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(contacts::router())
        .merge(connections::router())
        .merge(reservations::router())
        .merge(statistics::router())
        .merge(sync::router())
        .merge(health::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // CORS - 单机局域网部署，前端端口不固定
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
