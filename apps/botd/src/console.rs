//! Line-oriented chat binding for running without an external bot API.
//!
//! Commands keep their slash syntax (`/download <url>`), button presses are
//! entered as `!<data>` using the data shown next to each option, and any
//! other input is free text.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use linkfetch_bot::{ChatError, ChatId, ChatTransport, Choice, Incoming, MessageId};

#[derive(Default)]
pub struct ConsoleChat {
    next_id: AtomicI64,
}

impl ConsoleChat {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> MessageId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for ConsoleChat {
    async fn send(&self, _chat: ChatId, text: &str) -> Result<MessageId, ChatError> {
        let id = self.next_id();
        println!("[bot] {text}");
        Ok(id)
    }

    async fn edit(&self, _chat: ChatId, message: MessageId, text: &str) -> Result<(), ChatError> {
        // No in-place edits on a terminal; reprint tagged with the id.
        println!("[bot ~{message}] {text}");
        Ok(())
    }

    async fn send_choices(
        &self,
        _chat: ChatId,
        text: &str,
        choices: &[Choice],
    ) -> Result<MessageId, ChatError> {
        let id = self.next_id();
        println!("[bot] {text}");
        for choice in choices {
            println!("  !{} - {}", choice.data, choice.label);
        }
        Ok(id)
    }
}

/// Classifies one input line. Empty lines yield `None`.
pub fn parse_line(line: &str) -> Option<Incoming> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(data) = line.strip_prefix('!') {
        return Some(Incoming::Callback(data.trim().to_string()));
    }

    if let Some(rest) = line.strip_prefix('/') {
        let mut parts = rest.split_whitespace();
        let name = parts.next()?.to_string();
        let args = parts.map(str::to_string).collect();
        return Some(Incoming::Command { name, args });
    }

    Some(Incoming::Text(line.to_string()))
}
