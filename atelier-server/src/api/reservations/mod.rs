//! Reservation API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/reservations",
            get(handler::list).post(handler::create),
        )
        .route("/api/notification-logs", get(handler::notification_logs))
}
