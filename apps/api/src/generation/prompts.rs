// All LLM prompt text for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.
//
// Builders are pure: identical inputs produce byte-identical prompts.

use crate::generation::error::GenerationError;
use crate::generation::schema;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::models::resume::ResumeDocument;

/// Role line for fresh generation.
const GENERATION_ROLE: &str = "You are an expert resume writer who tailors a candidate's real \
    background to one specific job description.";

/// Style and length rules for fresh generation.
const GENERATION_RULES: &str = "\
RULES:
1. Output strict JSON only: one object matching the structure given by the user.
2. The resume must fit on ONE printed page. Aim to fill 95-100% of the page and never spill onto a second page.
3. Bullets are short, ideally one line, and start with a strong action verb.
4. Quantify impact wherever the background supports it (numbers, percentages, scale, time or money saved).
5. Include roughly 3-5 experience entries with 3-4 bullets each, most relevant to the target job first.
6. Keep the summary to 2-3 sentences.
7. Put the skills the target job asks for first, but only skills the candidate actually has.";

/// Role line for refinement.
const REFINEMENT_ROLE: &str =
    "You are an expert resume editor revising an existing one-page resume according to the \
    candidate's feedback.";

/// Editing rules for refinement.
const REFINEMENT_RULES: &str = "\
RULES:
1. If the feedback asks to condense or shorten: shorten bullets, merge overlapping bullets, and drop the lowest-impact items first.
2. If the feedback asks to expand or add detail: add quantified detail grounded in what the resume already says.
3. Preserve the section structure and every field name exactly.
4. Preserve every quantifiable result (numbers, percentages, amounts) unless the feedback explicitly asks to remove it.
5. Leave sections the feedback does not mention unchanged.
6. Output strict JSON only: the complete revised resume object, not a diff.";

/// Formatting rules appended to every user prompt.
const FORMATTING_RULES: &str = "\
FORMATTING RULES:
- Respond with the JSON object only.
- No commentary, no markdown code fences, no delimiters before or after the JSON.
- Every list item is a plain string.
- Omit optional fields you have no facts for; never emit null or placeholder text.";

/// The pair of texts sent to the provider for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Builds generation and refinement prompts.
///
/// `content_rules` are deployment-specific shaping rules loaded from
/// configuration (e.g. "keep the internship to a single bullet"). They are
/// appended verbatim to both system prompts.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    content_rules: Vec<String>,
}

impl PromptBuilder {
    pub fn new(content_rules: Vec<String>) -> Self {
        Self { content_rules }
    }

    /// Prompt for a fresh resume. Callers must reject blank inputs first.
    pub fn build_generation_prompt(&self, about_me: &str, target_text: &str) -> PromptPair {
        let system = self.system_text(&[
            GENERATION_ROLE,
            JSON_ONLY_SYSTEM,
            GENERATION_RULES,
            GROUNDING_INSTRUCTION,
        ]);

        let user = format!(
            "ABOUT ME (the only source of facts):\n{about_me}\n\n\
            TARGET JOB:\n{target_text}\n\n\
            OUTPUT STRUCTURE (field names are exact; values describe what to write):\n{template}\n\n\
            {FORMATTING_RULES}",
            about_me = about_me.trim(),
            target_text = target_text.trim(),
            template = schema::template_text(),
        );

        PromptPair { system, user }
    }

    /// Prompt for revising `prior` according to `feedback`.
    pub fn build_refinement_prompt(
        &self,
        prior: &ResumeDocument,
        feedback: &str,
    ) -> Result<PromptPair, GenerationError> {
        let system = self.system_text(&[
            REFINEMENT_ROLE,
            JSON_ONLY_SYSTEM,
            REFINEMENT_RULES,
            GROUNDING_INSTRUCTION,
        ]);

        let resume_json = serde_json::to_string_pretty(prior).map_err(|e| {
            GenerationError::MalformedRefinementInput(format!("failed to serialize resume: {e}"))
        })?;

        let user = format!(
            "CURRENT RESUME (JSON):\n{resume_json}\n\n\
            FEEDBACK:\n{feedback}\n\n\
            Return the complete revised resume with the same structure.\n\n\
            {FORMATTING_RULES}"
        );

        Ok(PromptPair { system, user })
    }

    fn system_text(&self, sections: &[&str]) -> String {
        let mut text = sections.join("\n\n");
        if !self.content_rules.is_empty() {
            text.push_str("\n\nADDITIONAL CONTENT RULES (always apply):");
            for rule in &self.content_rules {
                text.push_str("\n- ");
                text.push_str(rule);
            }
        }
        text
    }
}

/// Parses a content-rules file: one rule per line, blank lines and `#`
/// comments ignored.
pub fn parse_content_rules(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
