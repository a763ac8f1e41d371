use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Autocomplete
        .route("/movies/suggestions", get(handlers::suggestions))
        // Ledger
        .route(
            "/ratings",
            get(handlers::list_ratings).post(handlers::add_rating),
        )
        .route("/ratings/:movie_id", delete(handlers::remove_rating))
        // Prediction
        .route(
            "/predictions",
            delete(handlers::cancel_prediction).post(handlers::predict),
        )
}
