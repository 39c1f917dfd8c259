//! HTTP routes.

mod address;
mod admin_orders;
mod admin_products;
mod auth;
mod cart;
mod feature;
mod order;
mod products;
mod review;
mod search;
mod wishlist;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::state::SharedState;

/// Build the full application router.
pub fn router(state: SharedState) -> Router {
    let server = &state.config.server;
    let cors = cors_layer(server);
    let uploads = ServeDir::new(&server.upload_dir);
    let body_limit = server.body_limit_bytes;

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/admin/products", admin_products::router())
        .nest("/api/admin/orders", admin_orders::router())
        .nest("/api/shop/products", products::router())
        .nest("/api/shop/cart", cart::router())
        .nest("/api/shop/address", address::router())
        .nest("/api/shop/order", order::router())
        .nest("/api/shop/search", search::router())
        .nest("/api/shop/review", review::router())
        .nest("/api/shop/wishlist", wishlist::router())
        .nest("/api/common/feature", feature::router())
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if server.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, CACHE_CONTROL, EXPIRES, PRAGMA])
        .allow_credentials(true)
}

async fn welcome() -> &'static str {
    "Storefront API is running"
}

async fn health() -> Json<Value> {
    Json(json!({ "success": true, "status": "ok" }))
}
