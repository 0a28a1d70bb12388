use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::history::HistoryEntry;
use crate::storage::{AboutMeStore, HistoryStore};

/// Append order. `seq` is assigned by the database on insert.
const LIST_HISTORY_SQL: &str =
    "SELECT id, target_text, result_html, created_at FROM generation_history ORDER BY seq";

/// PostgreSQL-backed store. Tables are created by `db::ensure_schema`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AboutMeStore for PgStore {
    async fn read(&self) -> Result<String> {
        let content: Option<String> =
            sqlx::query_scalar("SELECT content FROM about_me WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(content.unwrap_or_default())
    }

    async fn write(&self, content: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO about_me (id, content, updated_at)
            VALUES (1, $1, NOW())
            ON CONFLICT (id) DO UPDATE
                SET content = EXCLUDED.content, updated_at = NOW()
            "#,
        )
        .bind(content)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for PgStore {
    async fn append(&self, target_text: &str, result_html: &str) -> Result<HistoryEntry> {
        let entry = sqlx::query_as::<_, HistoryEntry>(
            r#"
            INSERT INTO generation_history (id, target_text, result_html)
            VALUES ($1, $2, $3)
            RETURNING id, target_text, result_html, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(target_text)
        .bind(result_html)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>> {
        let entries = sqlx::query_as::<_, HistoryEntry>(LIST_HISTORY_SQL)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
