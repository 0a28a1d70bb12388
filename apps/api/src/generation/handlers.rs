//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{GenerationRequest, ResumeDocument};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(default)]
    pub target_text: String,
    #[serde(default)]
    pub about_me: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefineBody {
    #[serde(default)]
    pub resume: Value,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub resume: ResumeDocument,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/generate
///
/// Generates a resume for `targetText`. When `aboutMe` is absent or blank the
/// saved About Me text is used.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<ResumeResponse>, AppError> {
    let about_me = match body.about_me.filter(|text| !text.trim().is_empty()) {
        Some(text) => text,
        None => {
            info!("No aboutMe in request; using saved About Me");
            state.about_me.read().await?
        }
    };

    let resume = state
        .generator
        .handle(GenerationRequest::Fresh {
            about_me,
            target_text: body.target_text,
        })
        .await?;

    Ok(Json(ResumeResponse { resume }))
}

/// POST /api/v1/resumes/refine
///
/// Returns a new resume revised per `feedback`. The submitted resume is not
/// modified or stored.
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(body): Json<RefineBody>,
) -> Result<Json<ResumeResponse>, AppError> {
    let resume = state
        .generator
        .handle(GenerationRequest::Refine {
            prior_resume: body.resume,
            feedback: body.feedback,
        })
        .await?;

    Ok(Json(ResumeResponse { resume }))
}
