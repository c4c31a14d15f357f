//! Integration test: serving flow (predict → cache → window log → drift report)

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use iris_serve::config::AppConfig;
use iris_serve::drift::MonitoringOutcome;
use iris_serve::registry::{LoadedModel, ModelName};
use iris_serve::server::{create_router, AppState};

fn test_config(dir: &tempfile::TempDir) -> AppConfig {
    AppConfig {
        cache_ttl: Duration::from_millis(200),
        window_size: 3,
        report_path: dir.path().join("drift_report.json"),
        ..AppConfig::default()
    }
}

fn test_state(config: AppConfig) -> Arc<AppState> {
    let state = AppState::new(config).unwrap();
    state
        .registry
        .insert(ModelName::LogisticModel, LoadedModel::demo_logistic());
    state
        .registry
        .insert(ModelName::RfModel, LoadedModel::demo_forest());
    Arc::new(state)
}

fn predict_request(model: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/predict/{}", model))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_predict_miss_then_hit() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(test_config(&dir));
    let app = create_router(Arc::clone(&state));

    let features = serde_json::json!({
        "sepal_length": 5.1,
        "sepal_width": 3.5,
        "petal_length": 1.4,
        "petal_width": 0.2,
    });

    let response = app
        .clone()
        .oneshot(predict_request("rf_model", features.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = json_body(response).await;
    assert_eq!(first["model"], "rf_model");
    assert_eq!(first["cache"], "MISS");

    let response = app
        .oneshot(predict_request("rf_model", features))
        .await
        .unwrap();
    let second = json_body(response).await;
    assert_eq!(second["cache"], "HIT");
    assert_eq!(first["prediction"], second["prediction"]);
}

#[tokio::test]
async fn test_expired_entry_recomputes_same_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        cache_ttl: Duration::from_millis(30),
        ..test_config(&dir)
    };
    let state = test_state(config);
    let app = create_router(Arc::clone(&state));

    let features = serde_json::json!({
        "sepal_length": 5.1,
        "sepal_width": 3.5,
        "petal_length": 1.4,
        "petal_width": 0.2,
    });

    let first = json_body(
        app.clone()
            .oneshot(predict_request("rf_model", features.clone()))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(first["cache"], "MISS");

    tokio::time::sleep(Duration::from_millis(60)).await;

    let second = json_body(
        app.oneshot(predict_request("rf_model", features))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(second["cache"], "MISS");
    assert_eq!(first["prediction"], second["prediction"]);
}

#[tokio::test]
async fn test_unknown_model_leaves_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(test_config(&dir));
    let app = create_router(Arc::clone(&state));

    let response = app
        .oneshot(predict_request(
            "svm_model",
            serde_json::json!({"sepal_length": 5.1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], true);

    // Nothing was cached and nothing was scheduled
    assert_eq!(state.cache.stats().size, 0);
    state.shutdown().await;
    assert!(state.window.is_empty());
}

#[tokio::test]
async fn test_out_of_range_features_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(test_config(&dir));
    let app = create_router(state);

    let response = app
        .oneshot(predict_request(
            "rf_model",
            serde_json::json!({"sepal_length": 42.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_monitoring_without_data() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(test_config(&dir));
    let app = create_router(Arc::clone(&state));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/monitoring")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["msg"], "No data.");

    // The "no data" path never writes an artifact
    assert!(!state.reporter.report_path().exists());
}

#[tokio::test]
async fn test_window_feeds_drift_report() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(test_config(&dir));
    let app = create_router(Arc::clone(&state));

    // Four distinct requests; window size is 3
    for petal_width in [1.1, 1.2, 1.3, 1.4] {
        let features = serde_json::json!({
            "sepal_length": 5.9,
            "sepal_width": 3.0,
            "petal_length": 4.2,
            "petal_width": petal_width,
        });
        let response = app
            .clone()
            .oneshot(predict_request("logistic_model", features))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Drain the background appends
    state.shutdown().await;
    assert_eq!(state.window.len(), 4);
    assert_eq!(state.tasks.processed(), 4);

    let sample = state.window.sample(3);
    assert_eq!(sample.len(), 3);
    assert_eq!(sample[0].features.as_array()[3], 1.2);
    assert_eq!(sample[2].features.as_array()[3], 1.4);

    let outcome = state.reporter.generate(&state.window).unwrap();
    let MonitoringOutcome::Generated { path, report } = outcome else {
        panic!("expected a generated report");
    };
    assert!(path.exists());
    assert_eq!(report.current_size, 3);
    assert_eq!(report.window_size, 3);
}

#[tokio::test]
async fn test_api_key_guards_predict_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        api_key: Some("sekret".to_string()),
        ..test_config(&dir)
    };
    let state = test_state(config);
    let app = create_router(state);

    let features = serde_json::json!({
        "sepal_length": 5.1,
        "sepal_width": 3.5,
        "petal_length": 1.4,
        "petal_width": 0.2,
    });

    // Missing key
    let response = app
        .clone()
        .oneshot(predict_request("rf_model", features.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct key
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict/rf_model")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-api-key", "sekret")
        .body(Body::from(features.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Health stays open
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_models_listing_and_request_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(test_config(&dir));
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/models")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers().contains_key("x-process-time"));

    let body = json_body(response).await;
    let models = body["available_models"].as_array().unwrap();
    assert!(models.contains(&serde_json::json!("logistic_model")));
    assert!(models.contains(&serde_json::json!("rf_model")));
}
