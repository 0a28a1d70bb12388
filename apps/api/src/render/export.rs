//! HTML → PDF/DOCX conversion through external converter programs.
//!
//! A converter is configured as a command template such as
//! `wkhtmltopdf --quiet {input} {output}`. The HTML is written to a scratch
//! directory, the command runs with the placeholders substituted, and the
//! output file is read back.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use crate::render::ExportError;

pub const DEFAULT_PDF_COMMAND: &str =
    "wkhtmltopdf --quiet --enable-local-file-access --page-size Letter {input} {output}";
pub const DEFAULT_DOCX_COMMAND: &str = "pandoc --from html --to docx --output {output} {input}";

pub const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Exporter {
    pdf_command: Vec<String>,
    docx_command: Vec<String>,
    timeout: Duration,
}

impl Exporter {
    pub fn new(pdf_command: &str, docx_command: &str) -> Self {
        Self {
            pdf_command: split_command(pdf_command),
            docx_command: split_command(docx_command),
            timeout: DEFAULT_EXPORT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Converts `html` to `format`, returning the converted file's bytes.
    pub async fn export(&self, html: &str, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        let template = match format {
            ExportFormat::Pdf => &self.pdf_command,
            ExportFormat::Docx => &self.docx_command,
        };
        let Some((program, _)) = template.split_first() else {
            return Err(ExportError::NotConfigured(format.extension()));
        };

        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("resume.html");
        let output = workdir.path().join(format!("resume.{}", format.extension()));
        tokio::fs::write(&input, html).await?;

        let args = substitute(&template[1..], &input, &output);
        debug!("Running {program} {}", args.join(" "));

        let child = Command::new(program)
            .args(&args)
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExportError::Spawn {
                program: program.clone(),
                source,
            })?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ExportError::TimedOut {
                program: program.clone(),
                seconds: self.timeout.as_secs(),
            })??;

        if !result.status.success() {
            return Err(ExportError::Failed {
                program: program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let bytes = tokio::fs::read(&output).await?;
        if bytes.is_empty() {
            return Err(ExportError::EmptyOutput);
        }

        info!("Exported {} ({} bytes)", format.extension(), bytes.len());
        Ok(bytes)
    }
}

fn split_command(template: &str) -> Vec<String> {
    template.split_whitespace().map(str::to_string).collect()
}

fn substitute(args: &[String], input: &Path, output: &Path) -> Vec<String> {
    let input = input.to_string_lossy();
    let output = output.to_string_lossy();
    args.iter()
        .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
        .collect()
}
