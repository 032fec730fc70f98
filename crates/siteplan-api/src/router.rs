use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Page
        .route("/", get(handlers::index_page))
        .route("/health", get(handlers::health_check))

        // Map
        .route("/api/v1/map", get(handlers::get_map))
        .route("/api/v1/features", get(handlers::get_features))

        // Sessions
        .route("/api/v1/sessions", post(handlers::create_session))
        .route(
            "/api/v1/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/v1/sessions/{id}/shape", put(handlers::put_shape))
        .route("/api/v1/sessions/{id}/messages", post(handlers::post_message))
        .route("/api/v1/sessions/{id}/selection", get(handlers::get_selection))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
