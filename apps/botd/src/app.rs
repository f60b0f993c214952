//! Wires the orchestrator to the console bindings and pumps stdin.

use std::sync::Arc;

use linkfetch_bot::{ChatTransport, Event, Orchestrator};
use linkfetch_fetcher::Fetcher;
use linkfetch_history::History;
use linkfetch_relay::RelaySender;
use tokio::io::AsyncBufReadExt;

use crate::config::Config;
use crate::console::{self, ConsoleChat};
use crate::outbox::OutboxRelay;

/// Chat id used for the single console session.
const CONSOLE_CHAT: i64 = 0;

pub async fn run(config: Config) -> anyhow::Result<()> {
    let history = History::open(&config.database_path).await?;
    let chat = Arc::new(ConsoleChat::new());

    let orchestrator = Orchestrator::new(
        Arc::clone(&chat) as Arc<dyn ChatTransport>,
        Fetcher::new()?,
        history,
        RelaySender::new(OutboxRelay::new(config.outbox_path.clone())),
        config.storage_path.clone(),
        config.authorized_user,
    );

    println!("linkfetch console. /start for commands, Ctrl-D to quit.");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(incoming) = console::parse_line(&line) else {
            continue;
        };
        orchestrator
            .handle(Event {
                chat: CONSOLE_CHAT,
                user: config.authorized_user,
                incoming,
            })
            .await;
    }

    Ok(())
}
