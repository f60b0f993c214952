//! Relays downloaded files to a third party over a secondary transport.
//!
//! The transport is independently authenticated and opaque to this crate —
//! sessions are pre-provisioned by the binding. The one discipline enforced
//! here is session scoping: every send opens its own session and tears it
//! down on both the success and failure paths. No pooling or reuse.

use std::path::Path;

use async_trait::async_trait;

/// Errors produced by the relay path.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("relay transport error: {0}")]
    Transport(String),
}

/// One open session on the secondary transport.
#[async_trait]
pub trait RelaySession: Send {
    /// Pushes a local file to `recipient` with a caption.
    async fn send_file(
        &mut self,
        recipient: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), RelayError>;

    /// Tears the session down. Called exactly once per session.
    async fn close(&mut self);
}

/// Opens sessions on the secondary transport.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn open(&self) -> Result<Box<dyn RelaySession>, RelayError>;
}

/// Sends files through a [`RelayTransport`], one session per call.
pub struct RelaySender<T: RelayTransport> {
    transport: T,
}

impl<T: RelayTransport> RelaySender<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Sends `path` to `recipient`, captioned with the base filename.
    ///
    /// Fails with [`RelayError::FileNotFound`] before any session is opened
    /// if the path does not exist. Otherwise the session is closed whether or
    /// not the push succeeds.
    pub async fn send(&self, path: &Path, recipient: &str) -> Result<(), RelayError> {
        if !path.exists() {
            return Err(RelayError::FileNotFound(path.display().to_string()));
        }

        let caption = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut session = self.transport.open().await?;
        let result = session.send_file(recipient, path, &caption).await;
        session.close().await;

        match &result {
            Ok(()) => tracing::info!(file = %path.display(), recipient, "relay complete"),
            Err(err) => tracing::warn!(file = %path.display(), recipient, error = %err, "relay failed"),
        }
        result
    }
}
