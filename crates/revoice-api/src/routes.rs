//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{convert_video, health, upload_form};
use crate::state::AppState;

/// Create the router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(upload_form).post(convert_video))
        .route("/health", get(health))
        // Uploads are whole videos; lift axum's default extractor cap and
        // enforce the configured limit instead.
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
