use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/:id/reset", post(handlers::reset_session))
        // Recommendations
        .route(
            "/sessions/:id/recommendations",
            post(handlers::request_recommendations),
        )
        .route(
            "/sessions/:id/recommendations.txt",
            get(handlers::get_recommendations_text),
        )
        // Read list
        .route(
            "/sessions/:id/read",
            get(handlers::get_read_list)
                .post(handlers::mark_read)
                .put(handlers::import_read_list)
                .delete(handlers::clear_read_list),
        )
        .route("/sessions/:id/read.txt", get(handlers::export_read_list))
        .layer(
            ServiceBuilder::new()
                .layer(request_id::set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(request_id::make_span))
                .layer(request_id::propagate_request_id_layer())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
