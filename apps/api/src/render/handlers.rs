//! Axum route handlers for rendering and export.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::generation::normalizer::normalize;
use crate::render::{render_resume_html, ExportFormat};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RenderBody {
    #[serde(default)]
    pub resume: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HtmlBody {
    #[serde(default)]
    pub html: String,
}

/// POST /api/v1/resumes/render
///
/// The submitted resume goes through the normalizer first, so a hand-edited
/// document with missing sections still renders.
pub async fn handle_render(Json(body): Json<RenderBody>) -> Result<Json<HtmlBody>, AppError> {
    if !body.resume.is_object() {
        return Err(AppError::Validation(
            "resume must be a JSON object".to_string(),
        ));
    }
    let html = render_resume_html(&normalize(body.resume))?;
    Ok(Json(HtmlBody { html }))
}

/// POST /api/v1/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(body): Json<HtmlBody>,
) -> Result<Response, AppError> {
    export(&state, &body.html, ExportFormat::Pdf).await
}

/// POST /api/v1/export/docx
pub async fn handle_export_docx(
    State(state): State<AppState>,
    Json(body): Json<HtmlBody>,
) -> Result<Response, AppError> {
    export(&state, &body.html, ExportFormat::Docx).await
}

async fn export(state: &AppState, html: &str, format: ExportFormat) -> Result<Response, AppError> {
    if html.trim().is_empty() {
        return Err(AppError::Validation("html is required".to_string()));
    }

    let bytes = state.exporter.export(html, format).await?;
    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"resume.{}\"", format.extension()),
        ),
    ];
    Ok((headers, bytes).into_response())
}
