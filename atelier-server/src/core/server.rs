//! HTTP 服务器

use tokio::net::TcpListener;
use tracing::info;

use crate::api;
use crate::utils::{AppError, AppResult};

use super::config::Config;
use super::state::ServerState;

pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// 启动 HTTP 服务器，阻塞直到收到 Ctrl+C
    pub async fn run(self) -> AppResult<()> {
        let app = api::build_app(self.state.clone());

        let addr = format!("0.0.0.0:{}", self.config.http_port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind {addr}: {e}")))?;

        info!(
            addr = %addr,
            environment = %self.config.environment,
            timezone = %self.config.timezone,
            "Atelier server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {e}")))?;

        info!("Server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    info!("Shutdown signal received");
}
