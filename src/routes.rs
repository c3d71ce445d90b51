//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod applications;
mod items;
mod processing;

use crate::auth::{DATA_OWNER_HEADER, USER_HEADER};
use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    handler::Handler,
    http::{header, HeaderName, Method},
    routing::{get, post, MethodRouter},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    // Build the router
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/probe", get(health_check))

        // Item change proposals
        .route("/item-requests", get(items::list_item_requests))
        .route("/item-requests/{item_type}", get(items::list_item_requests_by_type))
        .route(
            "/item-requests/{item_type}/{filename}",
            post(items::create_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route("/items/{item_type}", get(items::list_items))

        // Processing proxy
        .route("/processing/{remote_backend}/processes", proxied(processing::processes))
        .route(
            "/processing/{remote_backend}/processes/{*path}",
            proxied(processing::processes_path),
        )
        .route("/processing/{remote_backend}/jobs", proxied(processing::jobs))
        .route("/processing/{remote_backend}/jobs/{*path}", proxied(processing::jobs_path))

        // Application packages
        .route("/applications/{application}", get(applications::get_application))

        // Apply middleware and state
        .layer(middleware)
        .with_state(state)
}

/// Route all relayed methods to `handler`; HEAD is served through GET
fn proxied<H, T>(handler: H) -> MethodRouter<SharedState>
where
    H: Handler<T, SharedState>,
    T: 'static,
{
    get(handler.clone())
        .post(handler.clone())
        .put(handler.clone())
        .delete(handler)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    };

    cors.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(USER_HEADER),
            HeaderName::from_static(DATA_OWNER_HEADER),
        ])
        .max_age(Duration::from_secs(3600))
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
