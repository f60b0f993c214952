//! Command dispatch and the per-session download flow.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use linkfetch_fetcher::{Fetcher, TransferRequest};
use linkfetch_file_ops::{create_folder, list_folders, rename_file};
use linkfetch_history::History;
use linkfetch_relay::{RelaySender, RelayTransport};

use crate::progress::ChatProgressSink;
use crate::state::ConversationState;
use crate::transport::{ChatError, ChatId, ChatTransport, Choice, Event, Incoming, UserId};

/// Callback payload for the "create a new folder" button.
const CREATE_NEW: &str = "create_new";
/// Callback payloads for the relay offer.
const RELAY_YES: &str = "relay_yes";
const RELAY_NO: &str = "relay_no";
/// Filename input meaning "keep the name derived from the URL".
const SKIP_SENTINEL: &str = "/skip";

const HELP_TEXT: &str = "Hi! I download files from links.\n\n\
Commands:\n\
/download <url> - download a file\n\
/folders - list storage folders\n\
/create_folder <name> - create a folder\n\
/rename <old> to <new> - rename a file\n\
/history - download history\n\
/cancel - abort the current flow";

const FILENAME_PROMPT: &str = "Send a filename, or /skip to keep the name from the URL.";

/// Sequences the conversation flow for every session.
///
/// States live in a per-chat map; a session holds an entry only while a flow
/// is active, so completion, cancellation and errors all reduce to dropping
/// the entry. Nothing is shared between sessions.
pub struct Orchestrator<R: RelayTransport> {
    chat: Arc<dyn ChatTransport>,
    fetcher: Fetcher,
    history: History,
    relay: RelaySender<R>,
    storage_root: PathBuf,
    authorized_user: UserId,
    sessions: Mutex<HashMap<ChatId, ConversationState>>,
}

impl<R: RelayTransport> Orchestrator<R> {
    pub fn new(
        chat: Arc<dyn ChatTransport>,
        fetcher: Fetcher,
        history: History,
        relay: RelaySender<R>,
        storage_root: PathBuf,
        authorized_user: UserId,
    ) -> Self {
        Self {
            chat,
            fetcher,
            history,
            relay,
            storage_root,
            authorized_user,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Processes one inbound event.
    ///
    /// Every event is identity-checked first; unauthorized input is rejected
    /// uniformly and never touches session state. Transport failures while
    /// replying are logged, not propagated.
    pub async fn handle(&self, event: Event) {
        if event.user != self.authorized_user {
            tracing::warn!(user = event.user, "rejected unauthorized event");
            if let Err(err) = self.chat.send(event.chat, "Access denied.").await {
                tracing::warn!(error = %err, "could not deliver rejection");
            }
            return;
        }

        let outcome = match &event.incoming {
            Incoming::Command { name, args } => self.on_command(event.chat, name, args).await,
            Incoming::Text(text) => self.on_text(event.chat, text).await,
            Incoming::Callback(data) => self.on_callback(event.chat, data).await,
        };

        if let Err(err) = outcome {
            tracing::warn!(chat = event.chat, error = %err, "reply not delivered");
        }
    }

    fn take_state(&self, chat: ChatId) -> ConversationState {
        self.sessions.lock().unwrap().remove(&chat).unwrap_or_default()
    }

    fn put_state(&self, chat: ChatId, state: ConversationState) {
        if !state.is_idle() {
            self.sessions.lock().unwrap().insert(chat, state);
        }
    }

    async fn on_command(
        &self,
        chat: ChatId,
        name: &str,
        args: &[String],
    ) -> Result<(), ChatError> {
        match name {
            "start" => {
                self.chat.send(chat, HELP_TEXT).await?;
                Ok(())
            }
            "download" => self.cmd_download(chat, args).await,
            "folders" => self.cmd_folders(chat).await,
            "create_folder" => self.cmd_create_folder(chat, args).await,
            "rename" => self.cmd_rename(chat, args).await,
            "history" => self.cmd_history(chat).await,
            "cancel" => self.cmd_cancel(chat).await,
            // "/skip" reaches us as a command; it only means something in the
            // filename step, where on_text knows what to do with it.
            "skip" => self.on_text(chat, SKIP_SENTINEL).await,
            _ => {
                self.chat
                    .send(chat, "Unknown command. Send /start for the command list.")
                    .await?;
                Ok(())
            }
        }
    }

    /// `/download <url>`: flow entry point. Replaces any flow already active
    /// in this session.
    async fn cmd_download(&self, chat: ChatId, args: &[String]) -> Result<(), ChatError> {
        // A fresh entry point resets whatever was in progress.
        let _ = self.take_state(chat);

        let Some(url) = args.first() else {
            self.chat.send(chat, "Usage: /download <url>").await?;
            return Ok(());
        };

        let folders = match list_folders(&self.storage_root) {
            Ok(folders) => folders,
            Err(err) => {
                self.chat
                    .send(chat, &format!("Could not list folders: {err}"))
                    .await?;
                return Ok(());
            }
        };

        let mut choices: Vec<Choice> = folders
            .iter()
            .map(|folder| Choice::new(folder.as_str(), folder.as_str()))
            .collect();
        choices.push(Choice::new("Create new folder", CREATE_NEW));

        self.put_state(chat, ConversationState::ChoosingFolder { url: url.clone() });
        self.chat
            .send_choices(chat, "Pick a folder to save into:", &choices)
            .await?;
        Ok(())
    }

    async fn cmd_folders(&self, chat: ChatId) -> Result<(), ChatError> {
        let text = match list_folders(&self.storage_root) {
            Ok(folders) if folders.is_empty() => "No folders yet.".to_string(),
            Ok(folders) => format!("Folders:\n{}", folders.join("\n")),
            Err(err) => format!("Could not list folders: {err}"),
        };
        self.chat.send(chat, &text).await?;
        Ok(())
    }

    async fn cmd_create_folder(&self, chat: ChatId, args: &[String]) -> Result<(), ChatError> {
        let name = args.join(" ");
        if name.is_empty() {
            self.chat.send(chat, "Usage: /create_folder <name>").await?;
            return Ok(());
        }

        let text = match create_folder(&self.storage_root.join(&name)) {
            Ok(()) => format!("Folder '{name}' created."),
            Err(err) => format!("Could not create folder: {err}"),
        };
        self.chat.send(chat, &text).await?;
        Ok(())
    }

    /// `/rename <old> to <new>`, both relative to the storage root.
    async fn cmd_rename(&self, chat: ChatId, args: &[String]) -> Result<(), ChatError> {
        let joined = args.join(" ");
        let Some((old, new)) = joined.split_once(" to ") else {
            self.chat
                .send(chat, "Usage: /rename <old> to <new>")
                .await?;
            return Ok(());
        };

        let text = match rename_file(&self.storage_root.join(old), &self.storage_root.join(new)) {
            Ok(()) => format!("Renamed '{old}' to '{new}'."),
            Err(err) => format!("Rename failed: {err}"),
        };
        self.chat.send(chat, &text).await?;
        Ok(())
    }

    async fn cmd_history(&self, chat: ChatId) -> Result<(), ChatError> {
        let text = match self.history.list().await {
            Ok(records) if records.is_empty() => "History is empty.".to_string(),
            Ok(records) => {
                let mut text = String::from("Download history:\n");
                for record in records {
                    text.push_str(&format!(
                        "\n{}\n  {}\n  {}\n  {}\n",
                        record.filename, record.url, record.filepath, record.timestamp
                    ));
                }
                text
            }
            Err(err) => format!("Could not read history: {err}"),
        };
        self.chat.send(chat, &text).await?;
        Ok(())
    }

    /// `/cancel`: drops the active flow, if any. No other side effects.
    async fn cmd_cancel(&self, chat: ChatId) -> Result<(), ChatError> {
        let state = self.take_state(chat);
        let text = if state.is_idle() {
            "Nothing to cancel."
        } else {
            "Cancelled."
        };
        self.chat.send(chat, text).await?;
        Ok(())
    }

    async fn on_callback(&self, chat: ChatId, data: &str) -> Result<(), ChatError> {
        match self.take_state(chat) {
            ConversationState::ChoosingFolder { url } => {
                if data == CREATE_NEW {
                    self.put_state(chat, ConversationState::NamingFolder { url });
                    self.chat
                        .send(chat, "Send a name for the new folder:")
                        .await?;
                } else {
                    self.put_state(
                        chat,
                        ConversationState::ChoosingFilename {
                            url,
                            folder: data.to_string(),
                        },
                    );
                    self.chat
                        .send(chat, &format!("Folder: {data}\n{FILENAME_PROMPT}"))
                        .await?;
                }
                Ok(())
            }
            ConversationState::OfferingRelay { result } => match data {
                RELAY_YES => {
                    let prompt = format!("Send the recipient to relay '{}' to:", result.filename);
                    self.put_state(chat, ConversationState::AwaitingRecipient { result });
                    self.chat.send(chat, &prompt).await?;
                    Ok(())
                }
                RELAY_NO => {
                    self.chat.send(chat, "Relay skipped.").await?;
                    Ok(())
                }
                _ => {
                    tracing::debug!(chat, data, "unexpected relay callback ignored");
                    self.put_state(chat, ConversationState::OfferingRelay { result });
                    Ok(())
                }
            },
            state => {
                tracing::debug!(chat, data, "stale callback ignored");
                self.put_state(chat, state);
                Ok(())
            }
        }
    }

    async fn on_text(&self, chat: ChatId, text: &str) -> Result<(), ChatError> {
        match self.take_state(chat) {
            ConversationState::NamingFolder { url } => {
                let name = text.trim();
                match create_folder(&self.storage_root.join(name)) {
                    Ok(()) => {
                        self.put_state(
                            chat,
                            ConversationState::ChoosingFilename {
                                url,
                                folder: name.to_string(),
                            },
                        );
                        self.chat
                            .send(
                                chat,
                                &format!("Folder '{name}' created.\n{FILENAME_PROMPT}"),
                            )
                            .await?;
                    }
                    Err(err) => {
                        // Flow ends; the session is back to idle.
                        self.chat
                            .send(chat, &format!("Could not create folder: {err}"))
                            .await?;
                    }
                }
                Ok(())
            }
            ConversationState::ChoosingFilename { url, folder } => {
                let trimmed = text.trim();
                let filename = if trimmed == SKIP_SENTINEL {
                    None
                } else {
                    Some(trimmed.to_string())
                };
                self.run_transfer(chat, url, &folder, filename).await
            }
            ConversationState::AwaitingRecipient { result } => {
                let recipient = text.trim();
                self.chat
                    .send(
                        chat,
                        &format!("Relaying '{}' to '{recipient}'...", result.filename),
                    )
                    .await?;

                let reply = match self.relay.send(&result.path, recipient).await {
                    Ok(()) => "File relayed.".to_string(),
                    Err(err) => format!("Relay failed: {err}"),
                };
                self.chat.send(chat, &reply).await?;
                Ok(())
            }
            state => {
                // Free text outside a flow step carries no meaning.
                tracing::debug!(chat, "text outside flow ignored");
                self.put_state(chat, state);
                Ok(())
            }
        }
    }

    /// Runs the transfer synchronously for this session: the conversation
    /// blocks here until the engine finishes or fails.
    async fn run_transfer(
        &self,
        chat: ChatId,
        url: String,
        folder: &str,
        filename: Option<String>,
    ) -> Result<(), ChatError> {
        let request = TransferRequest {
            url,
            directory: self.storage_root.join(folder),
            filename,
        };
        let sink = ChatProgressSink::new(Arc::clone(&self.chat), chat);

        match self.fetcher.fetch(&request, &sink).await {
            Ok(result) => {
                // The file is on disk either way; a history miss is logged
                // rather than failing the flow.
                if let Err(err) = self
                    .history
                    .record(&request.url, &result.filename, &result.path, result.completed_at)
                    .await
                {
                    tracing::warn!(error = %err, "download not recorded in history");
                }

                let offer = format!("Relay '{}' through your account?", result.filename);
                self.put_state(chat, ConversationState::OfferingRelay { result });
                self.chat
                    .send_choices(
                        chat,
                        &offer,
                        &[Choice::new("Yes", RELAY_YES), Choice::new("No", RELAY_NO)],
                    )
                    .await?;
            }
            Err(err) => {
                // Flow terminates; partial files (if any) are left for the
                // operator, matching the engine's no-cleanup contract.
                self.chat
                    .send(chat, &format!("Download failed: {err}"))
                    .await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use linkfetch_relay::{RelayError, RelaySession};
    use crate::transport::MessageId;
    use std::path::Path;
    use std::sync::atomic::{AtomicI64, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const OWNER: UserId = 7;
    const CHAT: ChatId = 1;

    /// Records everything the orchestrator says.
    #[derive(Default)]
    struct FakeChat {
        messages: Mutex<Vec<String>>,
        choices: Mutex<Vec<Vec<Choice>>>,
        next_id: AtomicI64,
    }

    impl FakeChat {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }

        fn last_message(&self) -> String {
            self.messages().last().cloned().unwrap_or_default()
        }

        fn last_choices(&self) -> Vec<Choice> {
            self.choices.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl ChatTransport for FakeChat {
        async fn send(&self, _chat: ChatId, text: &str) -> Result<MessageId, ChatError> {
            self.messages.lock().unwrap().push(text.to_string());
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
        }

        async fn edit(
            &self,
            _chat: ChatId,
            _message: MessageId,
            text: &str,
        ) -> Result<(), ChatError> {
            self.messages.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn send_choices(
            &self,
            _chat: ChatId,
            text: &str,
            choices: &[Choice],
        ) -> Result<MessageId, ChatError> {
            self.messages.lock().unwrap().push(text.to_string());
            self.choices.lock().unwrap().push(choices.to_vec());
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
        }
    }

    /// Relay transport that records pushed files.
    #[derive(Default, Clone)]
    struct FakeRelay {
        sent: Arc<Mutex<Vec<(String, PathBuf, String)>>>,
    }

    struct FakeRelaySession {
        sent: Arc<Mutex<Vec<(String, PathBuf, String)>>>,
    }

    #[async_trait]
    impl RelayTransport for FakeRelay {
        async fn open(&self) -> Result<Box<dyn RelaySession>, RelayError> {
            Ok(Box::new(FakeRelaySession {
                sent: Arc::clone(&self.sent),
            }))
        }
    }

    #[async_trait]
    impl RelaySession for FakeRelaySession {
        async fn send_file(
            &mut self,
            recipient: &str,
            path: &Path,
            caption: &str,
        ) -> Result<(), RelayError> {
            self.sent.lock().unwrap().push((
                recipient.to_string(),
                path.to_path_buf(),
                caption.to_string(),
            ));
            Ok(())
        }

        async fn close(&mut self) {}
    }

    struct Harness {
        chat: Arc<FakeChat>,
        relay: FakeRelay,
        storage: tempfile::TempDir,
        orchestrator: Orchestrator<FakeRelay>,
    }

    async fn harness() -> Harness {
        let storage = tempfile::tempdir().unwrap();
        let chat = Arc::new(FakeChat::default());
        let relay = FakeRelay::default();
        let history = History::open(&storage.path().join("history.db"))
            .await
            .unwrap();

        let orchestrator = Orchestrator::new(
            Arc::clone(&chat) as Arc<dyn ChatTransport>,
            Fetcher::new().unwrap(),
            history,
            RelaySender::new(relay.clone()),
            storage.path().join("files"),
            OWNER,
        );

        Harness {
            chat,
            relay,
            storage,
            orchestrator,
        }
    }

    fn cmd(name: &str, args: &[&str]) -> Event {
        Event {
            chat: CHAT,
            user: OWNER,
            incoming: Incoming::Command {
                name: name.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            },
        }
    }

    fn text(body: &str) -> Event {
        Event {
            chat: CHAT,
            user: OWNER,
            incoming: Incoming::Text(body.to_string()),
        }
    }

    fn callback(data: &str) -> Event {
        Event {
            chat: CHAT,
            user: OWNER,
            incoming: Incoming::Callback(data.to_string()),
        }
    }

    /// Serves `/clip.mp4` over HTTP for the download steps (HEAD then GET).
    async fn mock_file_server(body: Vec<u8>) -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/clip.mp4");

        let handle = tokio::spawn(async move {
            for _ in 0..2 {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = vec![0u8; 4096];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).into_owned();

                let header = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes()).await;
                if request.starts_with("GET") {
                    let _ = stream.write_all(&body).await;
                }
                let _ = stream.shutdown().await;
            }
        });

        (url, handle)
    }

    #[tokio::test]
    async fn unauthorized_user_is_rejected_everywhere() {
        let h = harness().await;
        let intruder = Event {
            chat: CHAT,
            user: 999,
            incoming: Incoming::Command {
                name: "download".into(),
                args: vec!["http://x/v.mp4".into()],
            },
        };

        h.orchestrator.handle(intruder).await;

        assert_eq!(h.chat.messages(), vec!["Access denied."]);
        assert!(h.chat.last_choices().is_empty());
    }

    #[tokio::test]
    async fn download_without_url_prints_usage() {
        let h = harness().await;
        h.orchestrator.handle(cmd("download", &[])).await;
        assert_eq!(h.chat.last_message(), "Usage: /download <url>");
    }

    #[tokio::test]
    async fn download_offers_existing_folders_and_create_new() {
        let h = harness().await;
        std::fs::create_dir_all(h.storage.path().join("files/Movies")).unwrap();

        h.orchestrator
            .handle(cmd("download", &["http://x/v.mp4"]))
            .await;

        let choices = h.chat.last_choices();
        assert!(choices.iter().any(|c| c.data == "Movies"));
        assert_eq!(choices.last().unwrap().data, CREATE_NEW);
    }

    #[tokio::test]
    async fn full_flow_with_existing_folder_and_skip() {
        let h = harness().await;
        std::fs::create_dir_all(h.storage.path().join("files/Movies")).unwrap();
        let (url, server) = mock_file_server(vec![0x5A; 64 * 1024]).await;

        h.orchestrator.handle(cmd("download", &[url.as_str()])).await;
        h.orchestrator.handle(callback("Movies")).await;
        h.orchestrator.handle(cmd("skip", &[])).await;

        // File landed under the chosen folder with the URL-derived name.
        let saved = h.storage.path().join("files/Movies/clip.mp4");
        assert_eq!(std::fs::read(&saved).unwrap().len(), 64 * 1024);

        // One history row was written.
        let rows = h.orchestrator.history.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filename, "clip.mp4");

        // Relay offer shown with yes/no buttons.
        assert_eq!(h.chat.last_message(), "Relay 'clip.mp4' through your account?");
        let choices = h.chat.last_choices();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].data, RELAY_YES);

        server.abort();
    }

    #[tokio::test]
    async fn create_new_folder_path_advances_to_filename_step() {
        let h = harness().await;
        let (url, server) = mock_file_server(vec![1; 512]).await;

        h.orchestrator.handle(cmd("download", &[url.as_str()])).await;
        h.orchestrator.handle(callback(CREATE_NEW)).await;
        h.orchestrator.handle(text("Clips")).await;

        assert!(h.storage.path().join("files/Clips").is_dir());
        assert!(h.chat.last_message().contains("Folder 'Clips' created."));
        assert!(h.chat.last_message().contains("/skip"));

        // Explicit filename instead of the sentinel.
        h.orchestrator.handle(text("my-clip.mp4")).await;
        assert!(h.storage.path().join("files/Clips/my-clip.mp4").exists());

        server.abort();
    }

    #[tokio::test]
    async fn folder_creation_failure_ends_the_flow() {
        let h = harness().await;
        std::fs::create_dir_all(h.storage.path().join("files")).unwrap();
        std::fs::write(h.storage.path().join("files/occupied"), b"file").unwrap();

        h.orchestrator
            .handle(cmd("download", &["http://x/v.mp4"]))
            .await;
        h.orchestrator.handle(callback(CREATE_NEW)).await;
        h.orchestrator.handle(text("occupied")).await;

        assert!(h.chat.last_message().starts_with("Could not create folder:"));
        // The flow is over: further text is ignored.
        h.orchestrator.handle(text("anything")).await;
        assert!(h.chat.last_message().starts_with("Could not create folder:"));
    }

    #[tokio::test]
    async fn unreachable_url_fails_the_flow_with_a_message() {
        let h = harness().await;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = format!("http://127.0.0.1:{port}/v.mp4");
        h.orchestrator.handle(cmd("download", &[url.as_str()])).await;
        h.orchestrator.handle(callback(CREATE_NEW)).await;
        h.orchestrator.handle(text("Incoming")).await;
        h.orchestrator.handle(cmd("skip", &[])).await;

        assert!(h.chat.last_message().starts_with("Download failed:"));
        assert!(h.orchestrator.history.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn relay_yes_sends_file_to_recipient() {
        let h = harness().await;
        std::fs::create_dir_all(h.storage.path().join("files/Movies")).unwrap();
        let (url, server) = mock_file_server(vec![2; 256]).await;

        h.orchestrator.handle(cmd("download", &[url.as_str()])).await;
        h.orchestrator.handle(callback("Movies")).await;
        h.orchestrator.handle(cmd("skip", &[])).await;
        h.orchestrator.handle(callback(RELAY_YES)).await;
        h.orchestrator.handle(text("@friend")).await;

        assert_eq!(h.chat.last_message(), "File relayed.");
        let sent = h.relay.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "@friend");
        assert_eq!(sent[0].2, "clip.mp4");

        server.abort();
    }

    #[tokio::test]
    async fn relay_no_resets_the_session() {
        let h = harness().await;
        std::fs::create_dir_all(h.storage.path().join("files/Movies")).unwrap();
        let (url, server) = mock_file_server(vec![3; 256]).await;

        h.orchestrator.handle(cmd("download", &[url.as_str()])).await;
        h.orchestrator.handle(callback("Movies")).await;
        h.orchestrator.handle(cmd("skip", &[])).await;
        h.orchestrator.handle(callback(RELAY_NO)).await;

        assert_eq!(h.chat.last_message(), "Relay skipped.");
        // A recipient typed afterwards goes nowhere.
        h.orchestrator.handle(text("@friend")).await;
        assert!(h.relay.sent.lock().unwrap().is_empty());

        server.abort();
    }

    #[tokio::test]
    async fn cancel_aborts_any_step() {
        let h = harness().await;

        h.orchestrator
            .handle(cmd("download", &["http://x/v.mp4"]))
            .await;
        h.orchestrator.handle(cmd("cancel", &[])).await;
        assert_eq!(h.chat.last_message(), "Cancelled.");

        h.orchestrator.handle(cmd("cancel", &[])).await;
        assert_eq!(h.chat.last_message(), "Nothing to cancel.");
    }

    #[tokio::test]
    async fn rename_with_existing_destination_reports_and_keeps_source() {
        let h = harness().await;
        let files = h.storage.path().join("files");
        std::fs::create_dir_all(&files).unwrap();
        std::fs::write(files.join("a.mp4"), b"source").unwrap();
        std::fs::write(files.join("b.mp4"), b"occupied").unwrap();

        h.orchestrator
            .handle(cmd("rename", &["a.mp4", "to", "b.mp4"]))
            .await;

        assert!(h.chat.last_message().starts_with("Rename failed:"));
        assert_eq!(std::fs::read(files.join("a.mp4")).unwrap(), b"source");
        assert!(h.orchestrator.history.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_without_separator_prints_usage() {
        let h = harness().await;
        h.orchestrator.handle(cmd("rename", &["a.mp4"])).await;
        assert_eq!(h.chat.last_message(), "Usage: /rename <old> to <new>");
    }

    #[tokio::test]
    async fn history_command_lists_records_newest_first() {
        let h = harness().await;
        std::fs::create_dir_all(h.storage.path().join("files/Movies")).unwrap();
        let (url, server) = mock_file_server(vec![4; 128]).await;

        h.orchestrator.handle(cmd("download", &[url.as_str()])).await;
        h.orchestrator.handle(callback("Movies")).await;
        h.orchestrator.handle(cmd("skip", &[])).await;
        h.orchestrator.handle(callback(RELAY_NO)).await;

        h.orchestrator.handle(cmd("history", &[])).await;
        let listing = h.chat.last_message();
        assert!(listing.starts_with("Download history:"));
        assert!(listing.contains("clip.mp4"));

        server.abort();
    }

    #[tokio::test]
    async fn unknown_command_points_to_start() {
        let h = harness().await;
        h.orchestrator.handle(cmd("frobnicate", &[])).await;
        assert_eq!(
            h.chat.last_message(),
            "Unknown command. Send /start for the command list."
        );
    }
}
