pub mod routes;

use std::sync::Arc;

use permalink::{CancellationToken, PathBuilder};
use tower_http::cors::CorsLayer;

use crate::backend::Backend;

/// Shared by every request handler.
pub struct AppState {
    pub backend: Backend,
    pub builder: PathBuilder,
    pub id_field: String,
    /// Fired on shutdown; in-flight builds stop before their next parent lookup.
    pub shutdown: CancellationToken,
}

/// Run the web server until Ctrl-C.
pub async fn run(addr: &str, backend: Backend, builder: PathBuilder, id_field: &str) -> Result<(), String> {
    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState {
        backend,
        builder,
        id_field: id_field.to_string(),
        shutdown: shutdown.clone(),
    });

    let app = routes::build_router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
            shutdown.cancel();
        })
        .await
        .map_err(|e| format!("Server error: {e}"))
}
