//! HTTP server implementation using Axum.

pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::errors::Result;
use crate::rag::RetrievalIndex;
use crate::tutor::Tutor;

/// Shared state for the handlers.
pub struct AppState {
    pub tutor: Arc<Tutor>,
    /// `None` when retrieval is unavailable
    pub index: Option<Arc<RetrievalIndex>>,
}

impl AppState {
    pub fn new(tutor: Arc<Tutor>) -> Self {
        let index = tutor.index().cloned();
        Self { tutor, index }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/index", post(routes::reindex))
        .route("/ask", post(routes::ask))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("EduBot listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
