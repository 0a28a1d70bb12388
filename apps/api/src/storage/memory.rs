use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::history::HistoryEntry;
use crate::storage::{AboutMeStore, HistoryStore};

/// In-process store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    about_me: RwLock<String>,
    history: RwLock<Vec<HistoryEntry>>,
}

#[async_trait]
impl AboutMeStore for MemoryStore {
    async fn read(&self) -> Result<String> {
        Ok(self.about_me.read().await.clone())
    }

    async fn write(&self, content: &str) -> Result<()> {
        *self.about_me.write().await = content.to_string();
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn append(&self, target_text: &str, result_html: &str) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            target_text: target_text.to_string(),
            result_html: result_html.to_string(),
            created_at: Utc::now(),
        };
        self.history.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.read().await.clone())
    }
}
