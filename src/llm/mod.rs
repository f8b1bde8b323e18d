//! Completion client for the external text-generation service.
//!
//! The wire shape is the OpenAI-style `/chat/completions` endpoint with a
//! bearer token. Configuration is an explicit [`CompletionConfig`] owned by
//! the process entry point; environment variables:
//! - `JOTTER_LLM_URL` - service endpoint (default: GitHub Models inference)
//! - `JOTTER_LLM_TOKEN` - bearer token (required)
//! - `JOTTER_LLM_MODEL` - model identifier
//! - `JOTTER_LLM_TIMEOUT_SECS` - request timeout (default: 120)

pub mod parse;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Language;

/// Default endpoint for the GitHub Models inference service.
const DEFAULT_ENDPOINT: &str = "https://models.github.ai/inference";

/// Default completion model.
const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";

/// Default request timeout (seconds). A hung upstream must never block a
/// handler indefinitely.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Completion service errors. All of these surface to the API as upstream
/// failures; none of them are swallowed.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Service { status: StatusCode, body: String },

    #[error("completion response contained no choices")]
    EmptyResponse,
}

/// Configuration for the completion client.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub token: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub top_p: f32,
}

impl CompletionConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let endpoint =
            std::env::var("JOTTER_LLM_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let token = std::env::var("JOTTER_LLM_TOKEN")
            .map_err(|_| anyhow::anyhow!("JOTTER_LLM_TOKEN must be set"))?;
        let model =
            std::env::var("JOTTER_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs = std::env::var("JOTTER_LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            endpoint,
            token,
            model,
            timeout: Duration::from_secs(timeout_secs),
            temperature: 1.0,
            top_p: 1.0,
        })
    }
}

/// Abstraction over the external completion call, so handlers can be tested
/// against a stub.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Run one completion with a system instruction and user text,
    /// returning the generated text.
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, LlmError>;

    /// Translate text to the target language.
    async fn translate(&self, language: Language, text: &str) -> Result<String, LlmError> {
        let system = format!("Translate the following text to {}.", language.as_str());
        self.complete(&system, text).await
    }

    /// Ask the model to turn free-form input into a structured note,
    /// returning the raw (unparsed) response text.
    async fn generate_note(&self, language: Language, input: &str) -> Result<String, LlmError> {
        let system = format!(
            "You are a note-taking assistant. Convert the user's input into a JSON object \
             with exactly these keys: \"Title\" (a short title), \"Notes\" (the note body) \
             and \"Tags\" (a list of short lowercase strings, may be empty). Write the title \
             and notes in {}. Respond with the JSON object only, no other text.",
            language.as_str()
        );
        self.complete(&system, input).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Reqwest-backed completion client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    config: CompletionConfig,
}

impl ChatClient {
    pub fn new(config: CompletionConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        tracing::info!(
            "Completion client ready: endpoint={}, model={}",
            config.endpoint,
            config.model
        );
        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionBackend for ChatClient {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_text.to_string(),
                },
            ],
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.endpoint))
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Service { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}
