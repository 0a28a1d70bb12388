use std::sync::Arc;

use crate::generation::service::GenerationService;
use crate::render::Exporter;
use crate::storage::{AboutMeStore, HistoryStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<GenerationService>,
    pub about_me: Arc<dyn AboutMeStore>,
    pub history: Arc<dyn HistoryStore>,
    pub exporter: Exporter,
}
