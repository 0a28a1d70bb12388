//! Axum route handlers for About Me and history.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::history::HistoryEntry;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AboutMeBody {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendHistoryBody {
    #[serde(default)]
    pub target_text: String,
    #[serde(default)]
    pub result_html: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryListResponse {
    pub entries: Vec<HistoryEntry>,
}

/// GET /api/v1/about-me
pub async fn handle_get_about_me(
    State(state): State<AppState>,
) -> Result<Json<AboutMeBody>, AppError> {
    let content = state.about_me.read().await?;
    Ok(Json(AboutMeBody { content }))
}

/// PUT /api/v1/about-me
pub async fn handle_put_about_me(
    State(state): State<AppState>,
    Json(body): Json<AboutMeBody>,
) -> Result<Json<AboutMeBody>, AppError> {
    state.about_me.write(&body.content).await?;
    Ok(Json(body))
}

/// GET /api/v1/history
pub async fn handle_list_history(
    State(state): State<AppState>,
) -> Result<Json<HistoryListResponse>, AppError> {
    let entries = state.history.list().await?;
    Ok(Json(HistoryListResponse { entries }))
}

/// POST /api/v1/history
pub async fn handle_append_history(
    State(state): State<AppState>,
    Json(body): Json<AppendHistoryBody>,
) -> Result<Json<HistoryEntry>, AppError> {
    if body.result_html.trim().is_empty() {
        return Err(AppError::Validation("resultHtml cannot be empty".to_string()));
    }
    let entry = state
        .history
        .append(&body.target_text, &body.result_html)
        .await?;
    Ok(Json(entry))
}
