#![forbid(unsafe_code)]
//! HTTP layer of agrimix.
//!
//! Thin axum handlers over the store and engine: extract, delegate, wrap in
//! the wire envelope. All database work happens behind one mutex-guarded
//! connection, which is the single-writer discipline the storage layer
//! assumes.

mod config;
mod handlers;
mod middleware;
mod state;

pub use config::ServerConfig;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub const CRATE_NAME: &str = "agrimix-server";

#[must_use]
pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.cors_allowed_origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = state
            .config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/api/customers",
            get(handlers::customers::list).post(handlers::customers::create),
        )
        .route("/api/customers/bulk", post(handlers::customers::create_bulk))
        .route(
            "/api/customers/:id",
            get(handlers::customers::get_one)
                .put(handlers::customers::update)
                .delete(handlers::customers::delete),
        )
        .route(
            "/api/stock",
            get(handlers::stock::list).post(handlers::stock::create),
        )
        .route(
            "/api/stock/:id",
            get(handlers::stock::get_one)
                .put(handlers::stock::update)
                .delete(handlers::stock::delete),
        )
        .route("/api/stock/:id/price", put(handlers::stock::set_price))
        .route(
            "/api/packages",
            get(handlers::packages::list).post(handlers::packages::create),
        )
        .route(
            "/api/packages/:id",
            put(handlers::packages::update).delete(handlers::packages::delete),
        )
        .route("/api/packages/:id/price", put(handlers::packages::set_price))
        .route(
            "/api/recipes",
            get(handlers::recipes::list).post(handlers::recipes::create),
        )
        .route("/api/recipes/update-prices", post(handlers::recipes::update_prices))
        .route(
            "/api/recipes/check-price-updates",
            get(handlers::recipes::check_price_updates),
        )
        .route(
            "/api/recipes/:id",
            get(handlers::recipes::get_one)
                .put(handlers::recipes::update)
                .delete(handlers::recipes::delete),
        )
        .route("/api/recipes/:id/copy", post(handlers::recipes::copy))
        .route(
            "/api/orders",
            get(handlers::orders::list).post(handlers::orders::create),
        )
        .route("/api/orders/active", get(handlers::orders::list_active))
        .route(
            "/api/orders/:id",
            get(handlers::orders::get_one).delete(handlers::orders::delete),
        )
        .route("/api/orders/:id/status", put(handlers::orders::update_status))
        .route(
            "/api/settings",
            get(handlers::settings::get_all).put(handlers::settings::update),
        )
        .route("/api/backup/database", post(handlers::backup::create_backup))
        .route("/api/backup/restore", post(handlers::backup::restore))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing_middleware,
        ))
        .layer(cors)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}
