use std::time::Duration;

use thiserror::Error;

/// Failure of a single generate/refine operation. Never carries a partial resume.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A required text input was blank. The message is user-facing.
    #[error("{0}")]
    MissingInput(String),

    #[error("LLM provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Generation timed out after {}s", .0.as_secs())]
    GenerationTimeout(Duration),

    /// Both tiers returned text that is not a JSON object. `raw` is the
    /// fallback tier's text, kept for operator diagnostics.
    #[error("Model output was not a JSON object ({} bytes)", .raw.len())]
    InvalidModelOutput { raw: String },

    #[error("Malformed resume for refinement: {0}")]
    MalformedRefinementInput(String),
}
