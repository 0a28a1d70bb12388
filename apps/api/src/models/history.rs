use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One saved generation: the job it targeted and the rendered result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub target_text: String,
    pub result_html: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}
