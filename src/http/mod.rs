//! HTTP layer: router, handlers and request/response plumbing.
//!
//! Middleware: request tracing and panic-to-500 conversion.

pub mod error;
pub mod handlers;
pub mod payload;
pub mod state;

pub use error::AppError;
pub use payload::Payload;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error::{QuickchatError, Result};

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/new_chat", post(handlers::new_chat))
        .route("/send_message", post(handlers::send_message))
        .route("/clear_chat", post(handlers::clear_chat))
        .route("/delete_chat", post(handlers::delete_chat))
        .route("/get_chat_history", get(handlers::get_chat_history))
        .route("/get_chat/:chat_id", get(handlers::get_chat))
        .route("/search_chats", get(handlers::search_chats))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(error::handle_panic)),
        )
        .with_state(state)
}

/// Bind `addr` and serve the router until the process is stopped.
///
/// # Errors
///
/// Returns error if the address cannot be bound or the server fails
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| QuickchatError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Quickchat listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
