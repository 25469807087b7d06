use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, Narrator};
use crate::config::SessionConfig;
use crate::error::NarratorError;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    format: &'static str,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

/// Narrator backed by a local Ollama server (`POST {host}/api/chat`).
#[derive(Debug, Clone)]
pub struct OllamaNarrator {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    top_p: f32,
    timeout_secs: u64,
}

impl OllamaNarrator {
    /// Build a client from the session configuration.
    pub fn new(config: &SessionConfig) -> Result<Self, NarratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NarratorError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", config.host.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            timeout_secs: config.timeout.as_secs(),
        })
    }

    /// The chat endpoint this narrator posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Narrator for OllamaNarrator {
    fn name(&self) -> &str {
        &self.model
    }

    fn complete(&mut self, messages: &[ChatMessage]) -> Result<String, NarratorError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            format: "json",
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
                top_p: self.top_p,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    NarratorError::Timeout(self.timeout_secs)
                } else {
                    NarratorError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NarratorError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| NarratorError::Transport(e.to_string()))?;
        let content = parsed.message.map(|m| m.content).unwrap_or_default();
        tracing::debug!(model = %self.model, raw = %content, "narrator reply");
        Ok(content)
    }
}
