//! Generation Client — two-tier structured generation against a `TextProvider`.
//!
//! Tier 1: schema-constrained call (provider enforces the resume schema).
//! Tier 2: JSON-mode call with the same prompts, no formal schema.
//!
//! At most two provider calls per operation, no other retries. One wall-clock
//! bound covers both tiers; when it fires the in-flight call is dropped.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::generation::error::GenerationError;
use crate::generation::prompts::PromptPair;
use crate::generation::schema;
use crate::llm_client::{strip_json_fences, CompletionRequest, LlmError, TextProvider};

pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Bound on the whole operation, both tiers included.
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Outcome of the schema-constrained tier.
#[derive(Debug)]
pub enum StructuredAttempt {
    Parsed(Value),
    /// Rejected by the provider or unparseable; the reason is for logs only.
    Failed(String),
}

/// Outcome of the JSON-mode tier.
#[derive(Debug)]
pub enum FallbackAttempt {
    Parsed(Value),
    Unparseable { raw: String },
    Rejected(LlmError),
}

pub struct GenerationClient {
    provider: Arc<dyn TextProvider>,
    schema: Value,
    settings: GenerationSettings,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn TextProvider>, settings: GenerationSettings) -> Self {
        Self {
            provider,
            schema: schema::json_schema(),
            settings,
        }
    }

    /// Runs both tiers under the configured bound and returns the provisional
    /// (unnormalized) JSON object.
    pub async fn generate(&self, prompts: &PromptPair) -> Result<Value, GenerationError> {
        let bound = self.settings.timeout;
        match tokio::time::timeout(bound, self.run_tiers(prompts)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Generation exceeded {}s bound; abandoning provider call", bound.as_secs());
                Err(GenerationError::GenerationTimeout(bound))
            }
        }
    }

    async fn run_tiers(&self, prompts: &PromptPair) -> Result<Value, GenerationError> {
        match self.attempt_structured(prompts).await {
            StructuredAttempt::Parsed(value) => {
                info!("Schema-constrained generation succeeded");
                return Ok(value);
            }
            StructuredAttempt::Failed(reason) => {
                warn!("Schema-constrained call failed ({reason}); falling back to JSON mode");
            }
        }

        match self.attempt_fallback(prompts).await {
            FallbackAttempt::Parsed(value) => {
                info!("JSON-mode fallback generation succeeded");
                Ok(value)
            }
            FallbackAttempt::Unparseable { raw } => {
                error!(
                    "JSON-mode fallback returned unparseable output ({} bytes)",
                    raw.len()
                );
                Err(GenerationError::InvalidModelOutput { raw })
            }
            FallbackAttempt::Rejected(e) => {
                error!("JSON-mode fallback call failed: {e}");
                Err(GenerationError::ProviderUnavailable(e.to_string()))
            }
        }
    }

    /// Tier 1: one schema-constrained provider call.
    pub async fn attempt_structured(&self, prompts: &PromptPair) -> StructuredAttempt {
        match self.provider.complete(self.request(prompts, Some(&self.schema))).await {
            Ok(text) => match parse_object(&text) {
                Some(value) => StructuredAttempt::Parsed(value),
                None => StructuredAttempt::Failed(format!(
                    "payload is not a JSON object ({} bytes)",
                    text.len()
                )),
            },
            Err(e) => StructuredAttempt::Failed(e.to_string()),
        }
    }

    /// Tier 2: one JSON-mode provider call.
    pub async fn attempt_fallback(&self, prompts: &PromptPair) -> FallbackAttempt {
        match self.provider.complete(self.request(prompts, None)).await {
            Ok(text) => match parse_object(&text) {
                Some(value) => FallbackAttempt::Parsed(value),
                None => FallbackAttempt::Unparseable { raw: text },
            },
            Err(LlmError::EmptyContent) => FallbackAttempt::Unparseable { raw: String::new() },
            Err(e) => FallbackAttempt::Rejected(e),
        }
    }

    fn request<'a>(
        &self,
        prompts: &'a PromptPair,
        schema: Option<&'a Value>,
    ) -> CompletionRequest<'a> {
        CompletionRequest {
            system: &prompts.system,
            user: &prompts.user,
            schema,
            temperature: self.settings.temperature,
            max_output_tokens: self.settings.max_output_tokens,
        }
    }
}

/// Parses a provider payload as a JSON object. Tolerates code fences and
/// prose around a single outermost `{ ... }`.
pub fn parse_object(text: &str) -> Option<Value> {
    let cleaned = strip_json_fences(text);
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(cleaned) {
        return Some(value);
    }

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&cleaned[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}
