// Resume Generation Engine
// Implements: schema declaration, prompt building, two-tier generation,
// normalization, and the generate/refine service.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod client;
pub mod error;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
pub mod schema;
pub mod service;

#[cfg(test)]
pub mod testing;
