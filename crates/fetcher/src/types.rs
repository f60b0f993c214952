use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// A request to download one URL into a target directory.
///
/// Immutable once the transfer starts; the final on-disk name may differ from
/// `filename` if the naming resolver has to avoid a collision.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Source URL.
    pub url: String,
    /// Directory the file is written into.
    pub directory: PathBuf,
    /// Desired filename; `None` means "derive from the URL".
    pub filename: Option<String>,
}

/// Outcome of one completed download.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferResult {
    /// Final resolved filename.
    pub filename: String,
    /// Absolute path of the written file.
    pub path: PathBuf,
    /// Total bytes written.
    pub bytes: u64,
    /// When the body was fully consumed and the file closed.
    pub completed_at: DateTime<Utc>,
}
