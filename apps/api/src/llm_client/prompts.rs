// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts alongside it.
// This file contains cross-cutting fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to all generation prompts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim must be traceable to the candidate's own background text. \
    Do NOT invent employers, titles, dates, degrees, certifications, metrics, or skills. \
    If the background does not support a claim, omit it entirely.";
