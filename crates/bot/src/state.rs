//! Per-session conversation state.

use linkfetch_fetcher::TransferResult;

/// Where one session currently is in the download flow.
///
/// Each variant owns exactly the data its step needs, so a transition cannot
/// carry stale values forward. `Idle` sessions are not stored at all; the
/// orchestrator's map only holds sessions with an active flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConversationState {
    /// No flow in progress.
    #[default]
    Idle,
    /// `/download` accepted; waiting for a folder button press.
    ChoosingFolder { url: String },
    /// "Create new folder" pressed; the next text is the folder name.
    NamingFolder { url: String },
    /// Folder settled; waiting for a filename or the skip sentinel.
    ChoosingFilename { url: String, folder: String },
    /// Download finished; yes/no relay buttons shown.
    OfferingRelay { result: TransferResult },
    /// Relay accepted; the next text is the recipient.
    AwaitingRecipient { result: TransferResult },
}

impl ConversationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
