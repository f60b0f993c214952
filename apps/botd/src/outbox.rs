//! Filesystem outbox standing in for the user-account relay transport.
//!
//! Files are delivered into `<outbox>/<recipient>/`; the recipient string is
//! used verbatim as a directory name.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use linkfetch_relay::{RelayError, RelaySession, RelayTransport};

pub struct OutboxRelay {
    root: PathBuf,
}

impl OutboxRelay {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl RelayTransport for OutboxRelay {
    async fn open(&self) -> Result<Box<dyn RelaySession>, RelayError> {
        Ok(Box::new(OutboxSession {
            root: self.root.clone(),
        }))
    }
}

struct OutboxSession {
    root: PathBuf,
}

#[async_trait]
impl RelaySession for OutboxSession {
    async fn send_file(
        &mut self,
        recipient: &str,
        path: &Path,
        _caption: &str,
    ) -> Result<(), RelayError> {
        let name = path
            .file_name()
            .ok_or_else(|| RelayError::Transport(format!("not a file: {}", path.display())))?;

        let dir = self.root.join(recipient);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;
        tokio::fs::copy(path, dir.join(name))
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;
        Ok(())
    }

    async fn close(&mut self) {}
}
