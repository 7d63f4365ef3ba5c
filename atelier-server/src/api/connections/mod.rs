//! Connection API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/connections", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/pending", get(handler::pending))
        .route("/{id}/bind", post(handler::bind))
        .route("/{id}/quick-create", post(handler::quick_create))
}
