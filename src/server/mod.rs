//! HTTP surface for the avatar editor UI

pub mod api;
pub mod handlers;

use crate::core::error::Result;
use crate::session::Session;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
}

impl AppState {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/command", post(handlers::command))
        .route(
            "/api/parameters",
            get(handlers::parameters).put(handlers::set_parameter),
        )
        .route("/api/parameters/reset", post(handlers::reset))
        .route("/api/chat", get(handlers::chat))
        .route("/api/schema", get(handlers::schema))
        .route("/api/health", get(handlers::health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(session: Arc<Session>, addr: &str) -> Result<()> {
    let natural_language = session.natural_language_enabled();
    let app = router(AppState::new(session));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, natural_language, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
