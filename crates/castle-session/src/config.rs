//! Configuration for a game session.

use std::time::Duration;

/// Default Ollama endpoint.
pub const DEFAULT_HOST: &str = "http://localhost:11434";
/// Default narrator model.
pub const DEFAULT_MODEL: &str = "llama3.1:8b";

/// Environment variable overriding the Ollama host.
pub const HOST_ENV: &str = "CASTLE_OLLAMA_HOST";
/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "CASTLE_MODEL";
/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "CASTLE_TIMEOUT_SECS";

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Base URL of the Ollama server.
    pub host: String,
    /// Model to ask for narration.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Request timeout.
    pub timeout: Duration,
    /// Number of earlier messages replayed to the narrator.
    pub history_messages: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            top_p: 0.9,
            timeout: Duration::from_secs(120),
            history_messages: 6,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `CASTLE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            config = config.with_host(host);
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            config = config.with_model(model);
        }
        if let Some(secs) = lookup(TIMEOUT_ENV).and_then(|s| s.trim().parse::<u64>().ok()) {
            config = config.with_timeout(secs);
        }
        config
    }

    /// Set the Ollama host. A trailing slash is removed.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout in seconds (at least 1).
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs.max(1));
        self
    }

    /// Set the sampling temperature (clamped to 0.0-2.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set how many earlier messages are replayed.
    pub fn with_history_messages(mut self, count: usize) -> Self {
        self.history_messages = count;
        self
    }
}
