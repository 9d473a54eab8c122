//! Chat-completion client for the "LLM Query" tool.

use serde::{Deserialize, Serialize};

use crate::app::domain::settings::Credential;
use crate::app::infrastructure::error::{AppError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
const TIMEOUT_SECS: u64 = 60;

/// The session's view of an LLM. Answers are plain text; failures come back
/// as an `"Error: ..."` string rather than a Rust error.
pub trait Assistant {
    fn set_api_key(&mut self, api_key: Option<&str>);
    fn query(&self, prompt: &str, max_tokens: u32) -> String;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.map(str::to_string),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Send one request and return the first choice's text.
    pub fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(AppError::ConfigMissing(Credential::LlmApiKey))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            max_tokens,
        };

        tracing::info!(model = %self.model, max_tokens, "sending LLM query");
        let response = minreq::post(&self.endpoint)
            .with_header("Authorization", format!("Bearer {api_key}"))
            .with_timeout(TIMEOUT_SECS)
            .with_json(&request)?
            .send()?;

        if !(200..300).contains(&response.status_code) {
            let body = response.as_str().unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| response.reason_phrase.clone());
            return Err(AppError::Http(format!("{} {}", response.status_code, detail)));
        }

        let parsed: ChatResponse = serde_json::from_str(response.as_str()?)?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| AppError::Http("response contained no choices".to_string()))
    }
}

impl Assistant for LlmClient {
    fn set_api_key(&mut self, api_key: Option<&str>) {
        self.api_key = api_key.map(str::to_string);
    }

    fn query(&self, prompt: &str, max_tokens: u32) -> String {
        match self.complete(prompt, max_tokens) {
            Ok(text) => text,
            Err(AppError::ConfigMissing(_)) => "Error: No API key configured".to_string(),
            Err(e) => {
                tracing::warn!("LLM query failed: {e}");
                format!("Error: {e}")
            }
        }
    }
}
