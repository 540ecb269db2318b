use std::{env, net::SocketAddr, sync::Arc};

mod core {
    pub mod app_state;
}
mod error_handler;
mod routes {
    pub mod health {
        pub mod health_route;
    }
    pub mod query {
        pub mod query_request;
        pub mod query_route;
    }
}

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::routes::{health::health_route::health_route, query::query_route::query_route};

const DEFAULT_API_ADDRESS: &str = "127.0.0.1:8001";

/// Builds the HTTP router over a ready [`AppState`].
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/query", post(query_route))
        .route("/api/health", get(health_route))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Loads state from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.into());
    let addr: SocketAddr = host_url
        .parse()
        .map_err(|_| AppError::InvalidAddress(host_url.clone()))?;

    let state = Arc::new(AppState::from_env().await?);
    let app = router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
