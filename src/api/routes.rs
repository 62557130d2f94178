use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Auth
        .route(
            "/auth/session",
            get(handlers::get_session)
                .post(handlers::sign_in)
                .delete(handlers::sign_out),
        )
        // Lists
        .route("/lists/:list_type", get(handlers::get_list))
        .route("/lists/:list_type/refresh", post(handlers::refresh_list))
        .route("/lists/:list_type/actor-filter", put(handlers::set_actor_filter))
        // Wheel
        .route("/wheel", get(handlers::get_wheel).delete(handlers::close_wheel))
        .route("/wheel/spin", post(handlers::spin))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
