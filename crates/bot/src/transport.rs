//! The seam between the orchestrator and a concrete chat transport.
//!
//! Implementors provide message delivery and in-place edits; the orchestrator
//! never talks to a bot API directly.

use async_trait::async_trait;

/// Identifier of a chat (one session per chat).
pub type ChatId = i64;

/// Identifier of the user behind an inbound event.
pub type UserId = i64;

/// Identifier of a previously sent message, used for in-place edits.
pub type MessageId = i64;

/// An inbound payload, already classified by the transport binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// A slash-style command with pre-split arguments.
    Command { name: String, args: Vec<String> },
    /// Free-form text.
    Text(String),
    /// A button press carrying its callback payload.
    Callback(String),
}

/// An inbound event scoped to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub chat: ChatId,
    pub user: UserId,
    pub incoming: Incoming,
}

/// One pressable button.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Text shown to the user.
    pub label: String,
    /// Payload delivered back as [`Incoming::Callback`].
    pub data: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Outbound failure reported by a transport binding.
#[derive(Debug, thiserror::Error)]
#[error("chat transport error: {0}")]
pub struct ChatError(pub String);

/// Outbound capabilities the orchestrator requires of the chat transport.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a text message, returning its id for later edits.
    async fn send(&self, chat: ChatId, text: &str) -> Result<MessageId, ChatError>;

    /// Edits a previously sent message in place.
    async fn edit(&self, chat: ChatId, message: MessageId, text: &str) -> Result<(), ChatError>;

    /// Sends a message with one button per choice.
    async fn send_choices(
        &self,
        chat: ChatId,
        text: &str,
        choices: &[Choice],
    ) -> Result<MessageId, ChatError>;
}
