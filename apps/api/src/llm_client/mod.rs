/// LLM Client — the single point of entry for all provider calls in Tailor.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All LLM interactions MUST go through `TextProvider`.
///
/// The wire dialect is chosen once at startup (`CallStyle`) and handed to the
/// constructor. It is never re-derived from the model name at request time.
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
/// Name of the forced tool used for schema-constrained Anthropic calls.
const SCHEMA_TOOL_NAME: &str = "emit_resume";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Which provider API dialect to speak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallStyle {
    /// OpenAI-compatible `/v1/chat/completions` with `response_format`.
    #[default]
    OpenAiChat,
    /// OpenAI `/v1/responses` with `text.format`.
    OpenAiResponses,
    /// Anthropic `/v1/messages`; schema enforcement via a forced tool.
    Anthropic,
}

impl CallStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            CallStyle::OpenAiChat => "openai-chat",
            CallStyle::OpenAiResponses => "openai-responses",
            CallStyle::Anthropic => "anthropic",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            CallStyle::OpenAiChat | CallStyle::OpenAiResponses => OPENAI_BASE_URL,
            CallStyle::Anthropic => ANTHROPIC_BASE_URL,
        }
    }
}

impl fmt::Display for CallStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai-chat" | "chat" => Ok(CallStyle::OpenAiChat),
            "openai-responses" | "responses" => Ok(CallStyle::OpenAiResponses),
            "anthropic" | "messages" => Ok(CallStyle::Anthropic),
            other => Err(format!(
                "unknown call style '{other}' (expected openai-chat, openai-responses or anthropic)"
            )),
        }
    }
}

/// One provider invocation. `schema: Some(..)` requests server-side structural
/// enforcement; `None` requests loose JSON-object framing.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub schema: Option<&'a Value>,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// The seam between the generation pipeline and a concrete provider.
/// Returns the textual payload of the response envelope.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonSchemaSpec<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat<'a> {
    JsonSchema { json_schema: JsonSchemaSpec<'a> },
    JsonObject,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_completion_tokens: u32,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TextFormat<'a> {
    JsonSchema {
        name: &'a str,
        strict: bool,
        schema: &'a Value,
    },
    JsonObject,
}

#[derive(Debug, Serialize)]
struct TextConfig<'a> {
    format: TextFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<WireMessage<'a>>,
    temperature: f32,
    max_output_tokens: u32,
    text: TextConfig<'a>,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<ResponsesOutputItem>,
}

#[derive(Debug, Deserialize)]
struct ResponsesOutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<ResponsesContentPart>,
}

#[derive(Debug, Deserialize)]
struct ResponsesContentPart {
    #[serde(rename = "type")]
    part_type: String,
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnthropicTool<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct AnthropicToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<AnthropicTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<AnthropicToolChoice<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
    input: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Request bodies
// ────────────────────────────────────────────────────────────────────────────

fn chat_request<'a>(model: &'a str, request: &CompletionRequest<'a>) -> ChatCompletionRequest<'a> {
    let response_format = match request.schema {
        Some(schema) => ResponseFormat::JsonSchema {
            json_schema: JsonSchemaSpec {
                name: crate::generation::schema::SCHEMA_NAME,
                strict: false,
                schema,
            },
        },
        None => ResponseFormat::JsonObject,
    };
    ChatCompletionRequest {
        model,
        messages: vec![
            WireMessage {
                role: "system",
                content: request.system,
            },
            WireMessage {
                role: "user",
                content: request.user,
            },
        ],
        temperature: request.temperature,
        max_completion_tokens: request.max_output_tokens,
        response_format,
    }
}

fn responses_request<'a>(model: &'a str, request: &CompletionRequest<'a>) -> ResponsesRequest<'a> {
    let format = match request.schema {
        Some(schema) => TextFormat::JsonSchema {
            name: crate::generation::schema::SCHEMA_NAME,
            strict: false,
            schema,
        },
        None => TextFormat::JsonObject,
    };
    ResponsesRequest {
        model,
        input: vec![
            WireMessage {
                role: "system",
                content: request.system,
            },
            WireMessage {
                role: "user",
                content: request.user,
            },
        ],
        temperature: request.temperature,
        max_output_tokens: request.max_output_tokens,
        text: TextConfig { format },
    }
}

fn anthropic_request<'a>(model: &'a str, request: &CompletionRequest<'a>) -> AnthropicRequest<'a> {
    let (tools, tool_choice) = match request.schema {
        Some(schema) => (
            vec![AnthropicTool {
                name: SCHEMA_TOOL_NAME,
                description: "Emit the finished resume as structured data.",
                input_schema: schema,
            }],
            Some(AnthropicToolChoice {
                choice_type: "tool",
                name: SCHEMA_TOOL_NAME,
            }),
        ),
        None => (Vec::new(), None),
    };
    AnthropicRequest {
        model,
        max_tokens: request.max_output_tokens,
        temperature: request.temperature,
        system: request.system,
        messages: vec![WireMessage {
            role: "user",
            content: request.user,
        }],
        tools,
        tool_choice,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Payload extraction
// ────────────────────────────────────────────────────────────────────────────

fn chat_payload(response: ChatCompletionResponse) -> Result<String, LlmError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or(LlmError::EmptyContent)?;

    if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
        return Err(LlmError::Api {
            status: 200,
            message: format!("model refused: {refusal}"),
        });
    }

    message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(LlmError::EmptyContent)
}

fn responses_payload(response: ResponsesResponse) -> Result<String, LlmError> {
    if let Some(text) = response.output_text.filter(|t| !t.trim().is_empty()) {
        return Ok(text);
    }

    // output[].type="message" -> content[].type="output_text" -> text
    let text: String = response
        .output
        .into_iter()
        .filter(|item| item.item_type == "message")
        .flat_map(|item| item.content)
        .filter(|part| part.part_type == "output_text")
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        Err(LlmError::EmptyContent)
    } else {
        Ok(text)
    }
}

fn anthropic_payload(response: AnthropicResponse, structured: bool) -> Result<String, LlmError> {
    if let Some(usage) = &response.usage {
        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            usage.input_tokens, usage.output_tokens
        );
    }

    if structured {
        if let Some(input) = response
            .content
            .iter()
            .find(|b| b.block_type == "tool_use")
            .and_then(|b| b.input.as_ref())
        {
            return Ok(input.to_string());
        }
    }

    response
        .content
        .into_iter()
        .find(|b| b.block_type == "text")
        .and_then(|b| b.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(LlmError::EmptyContent)
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

/// The single HTTP-backed provider used by Tailor.
/// Makes exactly one request per `complete` call; fallback policy lives in
/// the generation client, not here.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    style: CallStyle,
}

impl LlmClient {
    pub fn new(
        style: CallStyle,
        api_key: String,
        model: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base_url = base_url
            .unwrap_or_else(|| style.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            base_url,
            style,
        })
    }

    pub fn style(&self) -> CallStyle {
        self.style
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.post(&url).json(body);
        let builder = match self.style {
            CallStyle::Anthropic => builder
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            CallStyle::OpenAiChat | CallStyle::OpenAiResponses => {
                builder.bearer_auth(&self.api_key)
            }
        };

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TextProvider for LlmClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let structured = request.schema.is_some();
        debug!(
            "LLM call: style={}, model={}, structured={}",
            self.style, self.model, structured
        );

        match self.style {
            CallStyle::OpenAiChat => {
                let body = chat_request(&self.model, &request);
                let response: ChatCompletionResponse =
                    self.post_json("/v1/chat/completions", &body).await?;
                chat_payload(response)
            }
            CallStyle::OpenAiResponses => {
                let body = responses_request(&self.model, &request);
                let response: ResponsesResponse = self.post_json("/v1/responses", &body).await?;
                responses_payload(response)
            }
            CallStyle::Anthropic => {
                let body = anthropic_request(&self.model, &request);
                let response: AnthropicResponse = self.post_json("/v1/messages", &body).await?;
                anthropic_payload(response, structured)
            }
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
