//! # State Engine
//!
//! Keeps a local [`Store`] consistent with the gateway's event stream.
//!
//! Every event goes through the same pipeline:
//!
//! 1. pre handlers see the raw event while the store still holds the old state
//! 2. the [`Reconciler`] applies it to the store; diagnostics go to the sink
//! 3. post handlers see the event after the store was updated
//! 4. ready payloads and guild creates/deletes also notify the ready and
//!    guild lifecycle handlers
//!
//! Events must be applied one at a time, in delivery order.

mod diagnostics;
mod handler;
mod lifecycle;
mod reconciler;
mod snapshot;

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

pub use diagnostics::{DiagnosticSink, TracingSink};
pub use handler::Hooks;
pub use lifecycle::{GuildLifecycle, GuildLifecycleEvent, GuildTracker};
pub use reconciler::{store_guild_create, Reconciler};
pub use snapshot::Snapshot;

use crate::domain::Store;
use crate::gateway::Event;
use crate::infrastructure::metrics;
use crate::shared::error::StateError;

/// Gateway state: a store plus the hooks observing it.
pub struct State<S: Store> {
    reconciler: Reconciler<S>,
    hooks: Hooks,
    guilds: GuildTracker,
    sink: Box<dyn DiagnosticSink>,
    metrics_enabled: bool,
}

impl<S: Store> State<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            reconciler: Reconciler::new(store),
            hooks: Hooks::new(),
            guilds: GuildTracker::new(),
            sink: Box::new(TracingSink),
            metrics_enabled: false,
        }
    }

    /// Send diagnostics somewhere other than the log.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn store(&self) -> &Arc<S> {
        self.reconciler.store()
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.reconciler.snapshot()
    }

    /// Run one event through the pipeline. Returns how many diagnostics it
    /// produced; they have already been reported to the sink.
    pub async fn handle(&mut self, event: &Event) -> usize {
        let name = event.event_name();
        tracing::debug!(event = %name, guild_id = ?event.guild_id(), "applying event");

        self.hooks.call_pre(event);

        let started = Instant::now();
        let errors = self.reconciler.apply(event).await;
        for err in &errors {
            self.sink.report(name, err);
        }

        if self.metrics_enabled {
            let label = match event {
                Event::Unknown(_) => "UNKNOWN",
                _ => name,
            };
            metrics::record_event(label, errors.len(), started.elapsed().as_secs_f64());
            if store_was_reset(event, self.store().resetter().is_some(), &errors) {
                metrics::record_store_reset();
            }
        }

        match event {
            Event::Ready(ready) => {
                self.hooks.call(event);
                self.hooks.call_ready(ready);
                for change in self.guilds.ready(ready) {
                    self.hooks.call_guild(&change);
                }
            }
            Event::GuildCreate(guild) => {
                self.hooks.call(event);
                let change = self.guilds.guild_create(guild);
                self.hooks.call_guild(&change);
            }
            Event::GuildDelete(guild) => {
                self.hooks.call(event);
                let change = self.guilds.guild_delete(guild);
                self.hooks.call_guild(&change);
            }
            _ => self.hooks.call(&with_member_author(event)),
        }

        errors.len()
    }
}

/// A ready payload resets a store that supports it, unless the reset failed.
fn store_was_reset(event: &Event, can_reset: bool, errors: &[StateError]) -> bool {
    matches!(event, Event::Ready(_))
        && can_reset
        && !errors.iter().any(|e| e.context == reconciler::RESET_FAILED)
}

/// Message payloads carry the member without its user; post handlers get
/// the author filled in. The store keeps the payload as delivered.
fn with_member_author(event: &Event) -> Cow<'_, Event> {
    match event {
        Event::MessageCreate(m) | Event::MessageUpdate(m) if m.member.is_some() => {
            let mut enriched = event.clone();
            if let Event::MessageCreate(m) | Event::MessageUpdate(m) = &mut enriched {
                if let Some(member) = m.member.as_mut() {
                    member.user = m.author.clone();
                }
            }
            Cow::Owned(enriched)
        }
        _ => Cow::Borrowed(event),
    }
}
