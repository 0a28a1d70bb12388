//! Test doubles and fixtures shared by the generation, routes, and render tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm_client::{CompletionRequest, LlmError, TextProvider};
use crate::models::resume::ResumeDocument;

/// One scripted provider reply, consumed in order.
pub enum Reply {
    Text(String),
    Reject(u16, String),
    Empty,
    /// Never resolves.
    Hang,
}

impl Reply {
    pub fn json(value: Value) -> Self {
        Reply::Text(value.to_string())
    }
}

/// A `TextProvider` that replays a script and records what it was asked.
/// Running past the end of the script hangs, like a provider that never answers.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(bool, String, String)>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether each call carried a schema, in call order.
    pub fn schema_flags(&self) -> Vec<bool> {
        self.requests.lock().unwrap().iter().map(|r| r.0).collect()
    }

    pub fn system_prompts(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|r| r.1.clone()).collect()
    }

    pub fn user_prompts(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|r| r.2.clone()).collect()
    }
}

#[async_trait]
impl TextProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((
            request.schema.is_some(),
            request.system.to_string(),
            request.user.to_string(),
        ));

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Reject(status, message)) => Err(LlmError::Api { status, message }),
            Some(Reply::Empty) => Err(LlmError::EmptyContent),
            Some(Reply::Hang) | None => std::future::pending().await,
        }
    }
}

/// A fully populated, schema-shaped resume. Every schema field is present.
pub fn sample_resume_json() -> Value {
    json!({
        "name": "Ada Lovelace",
        "title": "Senior Backend Engineer",
        "contact": {
            "email": "ada@example.com",
            "phone": "+44 20 7946 0000",
            "location": "London, UK",
            "website": "https://ada.dev",
            "linkedin": "https://linkedin.com/in/ada",
            "github": "https://github.com/ada"
        },
        "summary": "Backend engineer with 6 years building low-latency Rust services.",
        "skills": {
            "core": ["Rust", "Distributed systems"],
            "tools": ["Kubernetes", "PostgreSQL"],
            "other": ["Technical writing"]
        },
        "experience": [
            {
                "company": "Acme",
                "role": "Senior Engineer",
                "location": "Remote",
                "startDate": "Jan 2021",
                "endDate": "Present",
                "bullets": [
                    "Cut p99 latency 40% by redesigning the caching layer",
                    "Led migration of 30 services to Kubernetes",
                    "Mentored 4 engineers through promotion"
                ]
            }
        ],
        "projects": [
            {
                "name": "Engine",
                "description": "Open-source job scheduler.",
                "bullets": ["Reached 2k GitHub stars"],
                "link": "https://github.com/ada/engine",
                "technologies": ["Rust", "Tokio"]
            }
        ],
        "education": [
            {
                "school": "University of London",
                "degree": "BSc Mathematics",
                "graduationDate": "2017",
                "details": ["First-class honours"]
            }
        ],
        "certifications": ["CKA"]
    })
}

pub fn sample_resume() -> ResumeDocument {
    serde_json::from_value(sample_resume_json()).unwrap()
}
