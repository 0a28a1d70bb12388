//! Generation Service — the boundary contract of the pipeline.
//!
//! Flow: validate inputs → build prompts → two-tier generate → normalize.
//!
//! Stateless across requests; one instance is shared behind `Arc` in
//! `AppState`. The only side effect is the outbound provider call.

use serde_json::Value;
use tracing::{info, warn};

use crate::generation::client::GenerationClient;
use crate::generation::error::GenerationError;
use crate::generation::normalizer::normalize;
use crate::generation::prompts::PromptBuilder;
use crate::models::resume::{GenerationRequest, ResumeDocument};

pub struct GenerationService {
    prompts: PromptBuilder,
    client: GenerationClient,
}

impl GenerationService {
    pub fn new(prompts: PromptBuilder, client: GenerationClient) -> Self {
        Self { prompts, client }
    }

    pub async fn handle(
        &self,
        request: GenerationRequest,
    ) -> Result<ResumeDocument, GenerationError> {
        match request {
            GenerationRequest::Fresh {
                about_me,
                target_text,
            } => self.handle_generate(&about_me, &target_text).await,
            GenerationRequest::Refine {
                prior_resume,
                feedback,
            } => self.handle_refine(&prior_resume, &feedback).await,
        }
    }

    /// Generates a resume from scratch.
    pub async fn handle_generate(
        &self,
        about_me: &str,
        target_text: &str,
    ) -> Result<ResumeDocument, GenerationError> {
        require_text(
            about_me,
            "About Me text is required. Add your background before generating.",
        )?;
        require_text(target_text, "A target job description is required.")?;

        info!(
            "Generating resume: about_me={} chars, target={} chars",
            about_me.len(),
            target_text.len()
        );

        let prompts = self.prompts.build_generation_prompt(about_me, target_text);
        let raw = self.client.generate(&prompts).await?;
        complete_document(raw)
    }

    /// Produces a new resume revising `prior_resume` per `feedback`.
    /// The prior document is left untouched.
    pub async fn handle_refine(
        &self,
        prior_resume: &Value,
        feedback: &str,
    ) -> Result<ResumeDocument, GenerationError> {
        let prior = parse_prior_resume(prior_resume)?;
        require_text(feedback, "Feedback is required to refine a resume.")?;

        info!(
            "Refining resume for {:?}: feedback={:?}",
            prior.name,
            feedback.chars().take(80).collect::<String>()
        );

        let prompts = self.prompts.build_refinement_prompt(&prior, feedback)?;
        let raw = self.client.generate(&prompts).await?;
        complete_document(raw)
    }
}

/// Normalizes provider output and rejects documents that still lack a name
/// or title; those are never returned as a success.
fn complete_document(raw: Value) -> Result<ResumeDocument, GenerationError> {
    let payload = raw.to_string();
    let resume = normalize(raw);
    if resume.name.trim().is_empty() || resume.title.trim().is_empty() {
        warn!("Model output is missing a name or title; rejecting it");
        return Err(GenerationError::InvalidModelOutput { raw: payload });
    }
    Ok(resume)
}

fn require_text(value: &str, message: &str) -> Result<(), GenerationError> {
    if value.trim().is_empty() {
        return Err(GenerationError::MissingInput(message.to_string()));
    }
    Ok(())
}

/// Basic shape checks on a client-supplied resume before it is sent back to
/// the model: it must be an object that deserializes as a `ResumeDocument`.
pub fn parse_prior_resume(value: &Value) -> Result<ResumeDocument, GenerationError> {
    if !value.is_object() {
        return Err(GenerationError::MalformedRefinementInput(
            "resume must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(value.clone())
        .map_err(|e| GenerationError::MalformedRefinementInput(e.to_string()))
}
