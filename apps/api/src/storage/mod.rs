//! About-me and history persistence.
//!
//! Both stores sit outside the generation pipeline: handlers read the saved
//! About Me before calling the service and clients append rendered results to
//! history afterwards. `AppState` holds them as `Arc<dyn …>`, backed by
//! PostgreSQL when `DATABASE_URL` is set and by `MemoryStore` otherwise.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::history::HistoryEntry;

pub mod handlers;
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Single-document store for the user's free-text background.
#[async_trait]
pub trait AboutMeStore: Send + Sync {
    /// Returns the saved text, or an empty string if nothing was saved yet.
    async fn read(&self) -> Result<String>;
    async fn write(&self, content: &str) -> Result<()>;
}

/// Append-only log of generated resumes.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, target_text: &str, result_html: &str) -> Result<HistoryEntry>;
    /// All entries, oldest first.
    async fn list(&self) -> Result<Vec<HistoryEntry>>;
}

/// Shares one backing store between both trait objects.
pub fn shared<S>(store: S) -> (Arc<dyn AboutMeStore>, Arc<dyn HistoryStore>)
where
    S: AboutMeStore + HistoryStore + 'static,
{
    let store = Arc::new(store);
    (store.clone(), store)
}
