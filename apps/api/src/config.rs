use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::generation::client::{
    GenerationSettings, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT,
};
use crate::generation::prompts::parse_content_rules;
use crate::llm_client::CallStyle;
use crate::render::export::{DEFAULT_DOCX_COMMAND, DEFAULT_EXPORT_TIMEOUT, DEFAULT_PDF_COMMAND};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the in-memory store is used.
    pub database_url: Option<String>,
    pub llm_api_key: String,
    pub llm_call_style: CallStyle,
    pub llm_model: String,
    pub llm_base_url: Option<String>,
    pub llm_temperature: f32,
    pub llm_max_output_tokens: u32,
    pub generation_timeout: Duration,
    pub content_rules: Vec<String>,
    pub pdf_command: String,
    pub docx_command: String,
    pub export_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_call_style: CallStyle = env_or("LLM_CALL_STYLE", CallStyle::default())?;
        let llm_model = optional_env("LLM_MODEL")
            .unwrap_or_else(|| default_model(llm_call_style).to_string());

        let content_rules = match optional_env("CONTENT_RULES_PATH") {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read content rules from '{path}'"))?;
                parse_content_rules(&text)
            }
            None => Vec::new(),
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_call_style,
            llm_model,
            llm_base_url: optional_env("LLM_BASE_URL"),
            llm_temperature: env_or("LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            llm_max_output_tokens: env_or("LLM_MAX_OUTPUT_TOKENS", DEFAULT_MAX_OUTPUT_TOKENS)?,
            generation_timeout: Duration::from_secs(env_or(
                "GENERATION_TIMEOUT_SECS",
                DEFAULT_TIMEOUT.as_secs(),
            )?),
            content_rules,
            pdf_command: optional_env("PDF_COMMAND")
                .unwrap_or_else(|| DEFAULT_PDF_COMMAND.to_string()),
            docx_command: optional_env("DOCX_COMMAND")
                .unwrap_or_else(|| DEFAULT_DOCX_COMMAND.to_string()),
            export_timeout: Duration::from_secs(env_or(
                "EXPORT_TIMEOUT_SECS",
                DEFAULT_EXPORT_TIMEOUT.as_secs(),
            )?),
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.llm_temperature,
            max_output_tokens: self.llm_max_output_tokens,
            timeout: self.generation_timeout,
        }
    }
}

fn default_model(style: CallStyle) -> &'static str {
    match style {
        CallStyle::OpenAiChat | CallStyle::OpenAiResponses => "gpt-4o",
        CallStyle::Anthropic => "claude-sonnet-4-20250514",
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Set and non-blank.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_or(key, optional_env(key).as_deref(), default)
}

fn parse_or<T>(key: &str, raw: Option<&str>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has an invalid value '{raw}': {e}")),
    }
}
