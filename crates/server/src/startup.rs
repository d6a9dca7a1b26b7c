use std::{future::Future, net::SocketAddr};

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect the configured store and wrap it in the router state.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let store = service::store::build_store(&cfg.store)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("store: {e}")))?;
    Ok(AppState::new(store, cfg.store.timeout()))
}

fn parse_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.server.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address {raw:?}: {e}")))
}

async fn bind(addr: SocketAddr) -> Result<TcpListener, StartupError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Public entry: build the app from config and run the HTTP server until
/// `shutdown` resolves. In-flight requests finish before this returns.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let backend = state.status.backend();
    let app = routes::build_router(state, build_cors());

    let addr = parse_bind_addr(&cfg)?;
    let listener = bind(addr).await?;
    info!(%addr, backend, timeout_ms = cfg.store.timeout_ms, "status registry listening");
    serve(listener, app, shutdown).await?;
    info!("status registry stopped");
    Ok(())
}
