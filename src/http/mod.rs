//! REST surface over the status client.
//!
//! # Endpoints
//!
//! - `GET /api/server-status?address=host[:port]` - status of a game server
//! - `GET /health` - liveness probe

mod handlers;

use std::{future::Future, sync::Arc};

use axum::{routing::get, Router};
use tokio::net::TcpListener;

use crate::{logging::StatusLogger, query::StatusClient};

/// Shared application state
pub struct AppState {
    pub client: StatusClient,
}

impl AppState {
    pub fn new(client: StatusClient) -> Self {
        Self { client }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/server-status", get(handlers::server_status))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        StatusLogger::listening(&addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
