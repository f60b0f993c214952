//! The streaming transfer engine.

use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::{FetchError, PROGRESS_STEP, TransferRequest, TransferResult, naming, probe};

/// A progress notification emitted while a download runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Final resolved filename being written.
    pub filename: String,
    /// Bytes written so far.
    pub downloaded: u64,
    /// Declared total size, when the server sent `Content-Length`.
    pub total: Option<u64>,
    /// `true` exactly once, on the update emitted after the last byte.
    pub finished: bool,
}

impl ProgressUpdate {
    /// Completion percentage, when the total size is known.
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some(self.downloaded as f64 / total as f64 * 100.0),
            _ => None,
        }
    }
}

/// Receiver for progress notifications.
///
/// Notification is fire-and-forget with respect to the byte copy: the engine
/// awaits the sink call but the sink cannot fail the transfer, and a slow
/// sink only degrades progress cadence.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn notify(&self, update: ProgressUpdate);
}

/// Streaming download engine.
///
/// Probes the URL, resolves a collision-free filename, then streams the body
/// to disk holding one file handle and one response stream. Memory use is
/// bounded by the chunk size, not the file size.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
        })
    }

    /// Wraps an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Downloads `request.url` into `request.directory`.
    ///
    /// Fails with [`FetchError::Unreachable`] before anything is written if
    /// the probe rejects the URL. On a mid-stream failure the partially
    /// written file is left in place and the underlying error propagates;
    /// cleanup is the caller's call to make.
    pub async fn fetch(
        &self,
        request: &TransferRequest,
        sink: &dyn ProgressSink,
    ) -> Result<TransferResult, FetchError> {
        if !probe::probe(&self.client, &request.url).await {
            return Err(FetchError::Unreachable(request.url.clone()));
        }

        let desired = request
            .filename
            .clone()
            .unwrap_or_else(|| naming::filename_from_url(&request.url));
        let filename = naming::unique_filename(&request.directory, &desired);
        let path = request.directory.join(&filename);

        let response = self
            .client
            .get(&request.url)
            .send()
            .await?
            .error_for_status()?;
        let total = response.content_length();

        // Exclusive creation: the naming resolver just verified the name is
        // free, and this is the single writer to the directory.
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        tracing::info!(url = %request.url, file = %path.display(), ?total, "download started");
        sink.notify(ProgressUpdate {
            filename: filename.clone(),
            downloaded: 0,
            total,
            finished: false,
        })
        .await;

        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;
        let mut next_report = PROGRESS_STEP;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            // Mid-transfer updates only make sense against a declared total.
            // The final chunk is reported below regardless of alignment.
            if total.is_some() && downloaded >= next_report && Some(downloaded) != total {
                sink.notify(ProgressUpdate {
                    filename: filename.clone(),
                    downloaded,
                    total,
                    finished: false,
                })
                .await;
                while next_report <= downloaded {
                    next_report += PROGRESS_STEP;
                }
            }
        }

        file.flush().await?;
        drop(file);

        sink.notify(ProgressUpdate {
            filename: filename.clone(),
            downloaded,
            total,
            finished: true,
        })
        .await;
        tracing::info!(file = %path.display(), bytes = downloaded, "download complete");

        Ok(TransferResult {
            filename,
            path,
            bytes: downloaded,
            completed_at: Utc::now(),
        })
    }
}
