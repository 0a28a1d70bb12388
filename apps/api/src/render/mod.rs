//! Presentation and export: ResumeDocument → HTML → PDF/DOCX.
//!
//! HTML is rendered in-process with tera. PDF and DOCX conversion is
//! delegated to external converters configured as command templates.

use std::process::ExitStatus;

use thiserror::Error;

pub mod export;
pub mod handlers;
pub mod html;

pub use export::{ExportFormat, Exporter};
pub use html::render_resume_html;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template error: {0}")]
    Template(String),

    #[error("no {0} converter command configured")]
    NotConfigured(&'static str),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("`{program}` did not finish within {seconds}s")]
    TimedOut { program: String, seconds: u64 },

    #[error("converter produced an empty document")]
    EmptyOutput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        ExportError::Template(e.to_string())
    }
}
