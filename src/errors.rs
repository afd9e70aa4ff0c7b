// src/errors.rs

use crate::services::engine::EngineError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Record not found: {0}")]
    NotFound(String),

    // Validation errors — rejected at the boundary, never clamped in the engine
    #[error("Validation error: {0}")]
    Validation(String),

    // Business logic errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] EngineError),

    #[error("No salary sheet has been generated yet")]
    NoSheetGenerated,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::NoSheetGenerated => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            // Misconfigured master data, not a malformed request
            AppError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

// Convenience alias
pub type AppResult<T> = Result<T, AppError>;
