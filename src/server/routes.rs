//! Route definitions.

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/municipalities", get(handlers::municipalities))
        .route("/api/search", get(handlers::search))
        .route("/api/dossiers/:pid", get(handlers::dossier))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}
