//! Request middleware: per-request metadata and API-key checks

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::info;
use uuid::Uuid;

use super::error::ServerError;
use super::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const API_KEY_HEADER: &str = "x-api-key";

/// Attach a request ID and processing time to every response, and emit one
/// structured log line per request.
pub async fn request_meta(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    info!(
        id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = duration.as_secs_f64() * 1000.0,
        "Request completed"
    );

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{:.3}s", duration.as_secs_f64())) {
        headers.insert("x-process-time", value);
    }

    response
}

/// Reject requests without the configured API key. A state without a key
/// configured leaves the route open.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if let Some(ref expected) = state.config.api_key {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            return Err(ServerError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}
