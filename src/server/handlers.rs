//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::cache::CacheStatus;
use crate::drift::MonitoringOutcome;
use crate::features::{FeatureVector, RawFeatures};
use crate::registry::ModelName;
use crate::window::WindowEntry;

use super::error::{Result, ServerError};
use super::state::AppState;

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Iris model serving",
    }))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let names: Vec<&str> = state.registry.names().iter().map(|n| n.as_str()).collect();
    Json(json!({
        "available_models": names,
    }))
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub model: String,
    pub prediction: i64,
    pub cache: CacheStatus,
}

/// Serve a prediction. The cached value is returned when still live;
/// otherwise the registry computes one and the cache is refreshed. The
/// window-log append is scheduled after the response value is final and
/// never delays or fails the response.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Path(model_name): Path<String>,
    Json(raw): Json<RawFeatures>,
) -> Result<Json<PredictResponse>> {
    let model: ModelName = model_name
        .parse()
        .map_err(|_| ServerError::NotFound(format!("Model not found: {}", model_name)))?;
    let features = FeatureVector::try_from(raw)
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let (prediction, cache) = state.predict(model, &features)?;

    if let Err(e) = state.tasks.submit(WindowEntry {
        features,
        prediction,
    }) {
        // The prediction stands either way
        warn!(error = %e, "Could not schedule window-log append");
    }

    Ok(Json(PredictResponse {
        model: model.to_string(),
        prediction,
        cache,
    }))
}

/// Generate and return the drift report for the current window sample
pub async fn monitoring(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>> {
    match state.reporter.generate(&state.window)? {
        MonitoringOutcome::NoData => Ok(Json(json!({
            "msg": "No data.",
        }))),
        MonitoringOutcome::Generated { path, report } => Ok(Json(json!({
            "path": path,
            "report": report,
        }))),
    }
}

pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "cache": state.cache.stats(),
        "window_entries": state.window.len(),
        "background": {
            "processed": state.tasks.processed(),
            "failed": state.tasks.failed(),
        },
    }))
}

pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let cleared = state.cache.len();
    state.cache.clear();
    Json(json!({
        "success": true,
        "cleared": cleared,
    }))
}
