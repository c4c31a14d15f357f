//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::IrisError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("No report available: {0}")]
    ReportUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<IrisError> for ServerError {
    fn from(err: IrisError) -> Self {
        match err {
            IrisError::ModelNotFound(name) => {
                ServerError::NotFound(format!("Model not found: {}", name))
            }
            IrisError::Validation(msg) => ServerError::BadRequest(msg),
            IrisError::ReportGeneration(msg) => ServerError::ReportUnavailable(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Invalid or missing API key".to_string())
            }
            ServerError::ReportUnavailable(msg) => {
                tracing::error!(detail = %msg, "Report generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "No report available".to_string(),
                )
            }
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
