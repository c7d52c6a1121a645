//! Application setup and server configuration.

use std::sync::Arc;

use axum::{extract::Extension, http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    health_handler, listings_handler, nearby_communities_handler, reverse_geocode_handler,
    zip_place_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
///
/// Everything the handlers touch comes from `deps`, so tests can build the
/// router over mock stores and geocoders without a database.
pub fn build_app(deps: ServerDeps) -> Router {
    let state = AxumAppState {
        deps: Arc::new(deps),
    };

    // Read-only API: any origin may browse
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/listings", get(listings_handler))
        .route("/api/locations/zip/:zip", get(zip_place_handler))
        .route("/api/locations/reverse", get(reverse_geocode_handler))
        .route("/api/locations/nearby", get(nearby_communities_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
