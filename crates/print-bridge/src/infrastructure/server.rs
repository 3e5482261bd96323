//! Server runner: backend selection, listener binding, graceful shutdown.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::application::PrintBackend;
use crate::domain::{BackendConfig, BridgeConfig};
use crate::infrastructure::http_api::{build_router, AppState};
use crate::infrastructure::local_backend::LocalBackend;
use crate::infrastructure::mock_backend::MockBackend;
use crate::infrastructure::remote_backend::RemoteBackend;

/// Instantiates the configured backend strategy.
pub fn backend_from_config(config: &BackendConfig) -> Arc<dyn PrintBackend> {
    match config {
        BackendConfig::Remote { base_url } => Arc::new(RemoteBackend::new(base_url.clone())),
        BackendConfig::Local(local) => Arc::new(LocalBackend::new(local.clone())),
        BackendConfig::Mock => Arc::new(MockBackend::new()),
    }
}

/// Builds the application for `config`.
pub fn build_app(config: &BridgeConfig) -> Router {
    let state = AppState::new(backend_from_config(&config.backend));
    build_router(state, config.static_dir.as_deref())
}

/// Serves `app` on an already bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the underlying server fails.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

/// Binds `config.bind_addr` and serves until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (e.g. the port is already
/// in use) or the server fails.
pub async fn run_server<F>(config: BridgeConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind listener on {}", config.bind_addr))?;

    let app = build_app(&config);
    info!(
        "print bridge listening on {} (backend: {})",
        config.bind_addr,
        config.backend.strategy()
    );
    if let Some(dir) = &config.static_dir {
        info!("serving static files from {}", dir.display());
    }

    serve(listener, app, shutdown).await?;

    info!("listener closed");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
