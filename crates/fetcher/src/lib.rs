//! URL probing and streaming downloads with progress reporting.
//!
//! The [`Fetcher`] checks that a URL is reachable and points at an actual
//! file, streams the body to disk in bounded chunks, and notifies an injected
//! [`ProgressSink`] as bytes accumulate. Filename derivation and collision
//! handling live in [`naming`].

mod download;
pub mod naming;
mod probe;
mod types;

pub use download::{Fetcher, ProgressSink, ProgressUpdate};
pub use probe::{probe, probe_with_timeout};
pub use types::{TransferRequest, TransferResult};

/// Download chunk size: 1 MiB.
///
/// Bounds the engine's memory use; the response body is never held in memory
/// as a whole.
pub const CHUNK_SIZE: u64 = 1024 * 1024;

/// Cumulative-byte interval between progress notifications: 5 MiB.
///
/// An update is emitted each time the downloaded total crosses a multiple of
/// this value, plus exactly once when the body is fully consumed.
pub const PROGRESS_STEP: u64 = 5 * CHUNK_SIZE;

/// Timeout for the reachability probe.
pub const PROBE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Errors produced by the fetcher crate.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("URL is unreachable or does not point at a file: {0}")]
    Unreachable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
