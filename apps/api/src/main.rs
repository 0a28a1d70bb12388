mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::generation::client::GenerationClient;
use crate::generation::prompts::PromptBuilder;
use crate::generation::service::GenerationService;
use crate::llm_client::LlmClient;
use crate::render::Exporter;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence: PostgreSQL when configured, in-memory otherwise
    let (about_me, history) = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            storage::shared(PgStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; About Me and history are kept in memory");
            storage::shared(MemoryStore::default())
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(
        config.llm_call_style,
        config.llm_api_key.clone(),
        config.llm_model.clone(),
        config.llm_base_url.clone(),
        config.generation_timeout,
    )?;
    info!(
        "LLM client initialized (style: {}, model: {})",
        llm.style(),
        llm.model()
    );

    if !config.content_rules.is_empty() {
        info!("Loaded {} content rules", config.content_rules.len());
    }
    let generator = GenerationService::new(
        PromptBuilder::new(config.content_rules.clone()),
        GenerationClient::new(Arc::new(llm), config.generation_settings()),
    );

    let state = AppState {
        generator: Arc::new(generator),
        about_me,
        history,
        exporter: Exporter::new(&config.pdf_command, &config.docx_command)
            .with_timeout(config.export_timeout),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
