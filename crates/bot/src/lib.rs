//! Conversation orchestrator for the download bot.
//!
//! Drives the per-session flow: link intake, folder selection or creation,
//! filename intake, synchronous transfer with chat-edited progress, history
//! recording, and an optional relay of the finished file to a third party.
//! The concrete chat transport is injected behind [`transport::ChatTransport`];
//! this crate only decides what to say and when.

mod orchestrator;
mod progress;
mod state;
pub mod transport;

pub use orchestrator::Orchestrator;
pub use progress::ChatProgressSink;
pub use state::ConversationState;
pub use transport::{ChatError, ChatId, ChatTransport, Choice, Event, Incoming, MessageId, UserId};
