//! API route definitions

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers, middleware, state::AppState};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": true,
            "message": "Not found. Check /api/health for API status.",
        })),
    )
}

async fn handle_405() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": true,
            "message": "Method not allowed.",
        })),
    )
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Prediction routes sit behind the optional API key
    let predict_routes = Router::new()
        .route("/predict/:model_name", post(handlers::predict))
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::require_api_key,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/models", get(handlers::list_models))
        .route("/monitoring", get(handlers::monitoring))
        .route("/cache/stats", get(handlers::cache_stats))
        .route("/cache", delete(handlers::clear_cache))
        .merge(predict_routes)
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405);

    Router::new()
        .nest("/api", api_routes)
        .route("/", get(handlers::root))
        .fallback(handle_404)
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::request_meta))
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
