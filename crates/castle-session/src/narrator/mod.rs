//! Narrator backends.
//!
//! A narrator turns a chat transcript into raw text that should contain a
//! JSON turn proposal. The session never trusts that text; it is parsed and
//! coerced before the rule engine sees it.

mod ollama;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::NarratorError;

pub use ollama::OllamaNarrator;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standing instructions.
    System,
    /// The game, speaking for the player.
    User,
    /// The narrator's earlier replies.
    Assistant,
}

/// One message of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who is speaking.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A source of narration.
pub trait Narrator {
    /// Short backend name for logs and status output.
    fn name(&self) -> &str;

    /// Answer the transcript with raw text.
    fn complete(&mut self, messages: &[ChatMessage]) -> Result<String, NarratorError>;
}

/// A narrator that always answers with an empty proposal.
///
/// The game then runs on the player's words alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineNarrator;

impl Narrator for OfflineNarrator {
    fn name(&self) -> &str {
        "offline"
    }

    fn complete(&mut self, _messages: &[ChatMessage]) -> Result<String, NarratorError> {
        Ok("{}".to_string())
    }
}

/// A narrator that replays queued replies, for tests and replays.
#[derive(Debug, Default)]
pub struct ScriptedNarrator {
    replies: VecDeque<Result<String, NarratorError>>,
    requests: Vec<Vec<ChatMessage>>,
}

impl ScriptedNarrator {
    /// Create a narrator with no replies queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw text reply.
    pub fn reply(mut self, text: impl Into<String>) -> Self {
        self.replies.push_back(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn fail(mut self, error: NarratorError) -> Self {
        self.replies.push_back(Err(error));
        self
    }

    /// Transcripts received so far, oldest first.
    pub fn requests(&self) -> &[Vec<ChatMessage>] {
        &self.requests
    }
}

impl Narrator for ScriptedNarrator {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(&mut self, messages: &[ChatMessage]) -> Result<String, NarratorError> {
        self.requests.push(messages.to_vec());
        self.replies.pop_front().unwrap_or(Err(NarratorError::Exhausted))
    }
}

impl<N: Narrator + ?Sized> Narrator for Box<N> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete(&mut self, messages: &[ChatMessage]) -> Result<String, NarratorError> {
        (**self).complete(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_is_empty_object() {
        let mut narrator = OfflineNarrator;
        assert_eq!(narrator.complete(&[]).unwrap(), "{}");
    }

    #[test]
    fn scripted_replays_in_order() {
        let mut narrator = ScriptedNarrator::new()
            .reply("first")
            .fail(NarratorError::InvalidJson);
        let msgs = [ChatMessage::user("hi")];
        assert_eq!(narrator.complete(&msgs).unwrap(), "first");
        assert!(matches!(narrator.complete(&msgs), Err(NarratorError::InvalidJson)));
        assert!(matches!(narrator.complete(&msgs), Err(NarratorError::Exhausted)));
        assert_eq!(narrator.requests().len(), 3);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
