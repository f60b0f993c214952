//! Chat-backed progress sink: renders download progress by editing one
//! status message in place.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use linkfetch_fetcher::{ProgressSink, ProgressUpdate};

use crate::transport::{ChatId, ChatTransport, MessageId};

/// Sink that sends one status message on the first update and edits it on
/// every subsequent one. Transport failures are logged and swallowed; the
/// engine's byte copy must never depend on progress delivery.
pub struct ChatProgressSink {
    chat: Arc<dyn ChatTransport>,
    chat_id: ChatId,
    message: Mutex<Option<MessageId>>,
}

impl ChatProgressSink {
    pub fn new(chat: Arc<dyn ChatTransport>, chat_id: ChatId) -> Self {
        Self {
            chat,
            chat_id,
            message: Mutex::new(None),
        }
    }

    fn render(update: &ProgressUpdate) -> String {
        if update.finished {
            return format!("Download complete: {}", update.filename);
        }
        if update.downloaded == 0 {
            return format!("Downloading {}...", update.filename);
        }
        match (update.total, update.percent()) {
            (Some(total), Some(percent)) => format!(
                "Downloading {}\n{:.1} MiB / {:.1} MiB ({percent:.1}%)",
                update.filename,
                mib(update.downloaded),
                mib(total),
            ),
            _ => format!(
                "Downloading {}\n{:.1} MiB",
                update.filename,
                mib(update.downloaded)
            ),
        }
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

#[async_trait]
impl ProgressSink for ChatProgressSink {
    async fn notify(&self, update: ProgressUpdate) {
        let text = Self::render(&update);
        let existing = *self.message.lock().unwrap();

        match existing {
            None => match self.chat.send(self.chat_id, &text).await {
                Ok(id) => *self.message.lock().unwrap() = Some(id),
                Err(err) => tracing::debug!(error = %err, "progress message not delivered"),
            },
            Some(id) => {
                if let Err(err) = self.chat.edit(self.chat_id, id, &text).await {
                    tracing::debug!(error = %err, "progress edit not delivered");
                }
            }
        }
    }
}
