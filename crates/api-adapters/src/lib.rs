//! picstash/crates/api-adapters/src/lib.rs
//!
//! The HTTP surface: thin glue between axum and the service layer. Every
//! route requires a bearer token; the UI owns everything beyond these four
//! operations.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use domains::{IdentityProvider, MetadataStore};
use services::IngestionPipeline;

/// State shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: IngestionPipeline,
    pub meta: Arc<dyn MetadataStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Builds the application router. CORS is permissive because the UI is
/// served from a different origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/images",
            post(handlers::upload_image).get(handlers::list_images),
        )
        .route("/images/{id}", patch(handlers::update_image))
        .route("/search", get(handlers::search_images))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
