//! # State Replay
//!
//! Replays a recorded gateway stream into an in-memory store.
//!
//! Reads one JSON frame per line from the file given as the first argument,
//! or from stdin. Frames that fail to decode are logged and skipped.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use chat_state::config::Settings;
use chat_state::domain::{ChannelStore, GuildStore, MessageStore};
use chat_state::gateway::GatewayReceive;
use chat_state::infrastructure::{metrics, MemoryStore};
use chat_state::state::State;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    chat_state::telemetry::init_tracing(&settings.log);

    info!(
        environment = %settings.environment,
        max_messages = settings.store.max_messages,
        metrics = settings.metrics.enabled,
        "Configuration loaded"
    );

    let input: Box<dyn AsyncBufRead + Unpin + Send> = match std::env::args().nth(1) {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("failed to open {path}"))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let store = Arc::new(MemoryStore::new(settings.store.max_messages));
    let mut state = State::new(Arc::clone(&store)).with_metrics(settings.metrics.enabled);

    let mut lines = input.lines();
    let mut line_no = 0usize;
    let (mut applied, mut skipped, mut diagnostics) = (0usize, 0usize, 0usize);

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let frame: GatewayReceive = match serde_json::from_str(line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed frame");
                skipped += 1;
                continue;
            }
        };

        let event = match frame.into_event() {
            Some(Ok(event)) => event,
            Some(Err(e)) => {
                warn!(line = line_no, error = %e, "Skipping undecodable dispatch");
                skipped += 1;
                continue;
            }
            None => continue,
        };

        diagnostics += state.handle(&event).await;
        applied += 1;
    }

    let guilds = store.guilds().await?;
    let mut messages = 0usize;
    for guild in &guilds {
        for channel in store.channels(guild.id).await? {
            messages += store.messages(channel.id).await?.len();
        }
    }

    info!(
        applied,
        skipped,
        diagnostics,
        guilds = guilds.len(),
        private_channels = store.private_channels().await?.len(),
        messages,
        "Replay finished"
    );

    println!("applied={applied} skipped={skipped} diagnostics={diagnostics}");
    for guild in &guilds {
        println!("guild {} {:?}", guild.id, guild.name);
    }

    if settings.metrics.enabled {
        print!("{}", metrics::gather_metrics());
    }

    Ok(())
}
