use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use todo_service::TodoService;
use todo_store::JsonFileStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Todo HTTP server.
pub struct TodoServer {
    config: ServerConfig,
}

impl TodoServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the configured store and wire the service around it.
    pub fn state(&self) -> ServerResult<AppState> {
        let store = JsonFileStore::open(&self.config.db_path)?;
        let service = TodoService::with_store_counter(Arc::new(store));
        Ok(AppState::new(service, self.config.fallback_redirect()))
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        Ok(build_router(self.state()?))
    }

    /// Start serving requests until ctrl-c.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!(
            addr = %self.config.bind_addr,
            db = %self.config.db_path.display(),
            "todo server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
