use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::error::GenerationError;
use crate::render::ExportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable (status, code, client message) triple for each error kind.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(e) => generation_parts(e),
            AppError::Export(ExportError::Template(msg)) => {
                tracing::error!("Resume template error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The resume could not be rendered".to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXPORT_ERROR",
                    "The document converter failed. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

fn generation_parts(error: &GenerationError) -> (StatusCode, &'static str, String) {
    match error {
        GenerationError::MissingInput(msg) => {
            (StatusCode::BAD_REQUEST, "MISSING_INPUT", msg.clone())
        }
        GenerationError::MalformedRefinementInput(msg) => (
            StatusCode::BAD_REQUEST,
            "MALFORMED_RESUME",
            format!("The resume to refine is malformed: {msg}"),
        ),
        GenerationError::ProviderUnavailable(msg) => {
            tracing::error!("LLM provider error: {msg}");
            (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_UNAVAILABLE",
                "The AI service is unavailable right now".to_string(),
            )
        }
        GenerationError::GenerationTimeout(bound) => {
            tracing::warn!("Generation timed out after {}s", bound.as_secs());
            (
                StatusCode::GATEWAY_TIMEOUT,
                "GENERATION_TIMEOUT",
                "Generation took too long. Please try again.".to_string(),
            )
        }
        GenerationError::InvalidModelOutput { raw } => {
            tracing::error!("LLM returned unparseable output: {raw}");
            (
                StatusCode::BAD_GATEWAY,
                "INVALID_MODEL_OUTPUT",
                "The AI returned an unreadable response. Please try again.".to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
