//! HTTP server for the roster API.
//!
//! Wraps the roster routes in an axum server with permissive CORS and
//! graceful shutdown driven by a cancellation token.

use crate::error::AppError;
use crate::services::roster::Roster;
use crate::services::roster_api::{roster_api_routes, RosterState};
use crate::services::source::MergeRequestSource;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

/// Build the full router around a shared roster.
pub fn router<S>(roster: Arc<Roster<S>>) -> Router
where
    S: MergeRequestSource + 'static,
{
    roster_api_routes()
        .with_state(RosterState { roster })
        .layer(CorsLayer::permissive())
}

/// Bind to `0.0.0.0:port`.
pub async fn bind(port: u16) -> Result<TcpListener, AppError> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to port {}: {}", port, e)))
}

/// Serve `app` on `listener` until `cancel` fires.
///
/// In-flight requests are allowed to finish; a request whose client goes
/// away is dropped along with its outbound GitLab calls.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    cancel: CancellationToken,
) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::internal(format!("Failed to read listener address: {}", e)))?;

    log::info!("[server] Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    log::info!("[server] Server stopped");
    Ok(())
}
