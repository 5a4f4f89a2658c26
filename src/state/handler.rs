//! Event Hooks
//!
//! Observer registry for the state pipeline. Handlers run synchronously on
//! the thread applying events, in registration order; a slow handler holds
//! up every event behind it.

use std::fmt;

use super::lifecycle::GuildLifecycleEvent;
use crate::gateway::{Event, Ready};

type EventHandler = Box<dyn Fn(&Event) + Send + Sync>;
type ReadyHandler = Box<dyn Fn(&Ready) + Send + Sync>;
type GuildHandler = Box<dyn Fn(&GuildLifecycleEvent) + Send + Sync>;

#[derive(Default)]
pub struct Hooks {
    pre: Vec<EventHandler>,
    post: Vec<EventHandler>,
    ready: Vec<ReadyHandler>,
    guild: Vec<GuildHandler>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the raw event before the store is touched.
    pub fn add_pre_handler(&mut self, handler: impl Fn(&Event) + Send + Sync + 'static) {
        self.pre.push(Box::new(handler));
    }

    /// Called after the store has been updated.
    pub fn add_handler(&mut self, handler: impl Fn(&Event) + Send + Sync + 'static) {
        self.post.push(Box::new(handler));
    }

    /// Called once per ready payload, after the post handlers.
    pub fn add_ready_handler(&mut self, handler: impl Fn(&Ready) + Send + Sync + 'static) {
        self.ready.push(Box::new(handler));
    }

    /// Called for every guild lifecycle change.
    pub fn add_guild_handler(&mut self, handler: impl Fn(&GuildLifecycleEvent) + Send + Sync + 'static) {
        self.guild.push(Box::new(handler));
    }

    pub(crate) fn call_pre(&self, event: &Event) {
        self.pre.iter().for_each(|h| h(event));
    }

    pub(crate) fn call(&self, event: &Event) {
        self.post.iter().for_each(|h| h(event));
    }

    pub(crate) fn call_ready(&self, ready: &Ready) {
        self.ready.iter().for_each(|h| h(ready));
    }

    pub(crate) fn call_guild(&self, event: &GuildLifecycleEvent) {
        self.guild.iter().for_each(|h| h(event));
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre", &self.pre.len())
            .field("post", &self.post.len())
            .field("ready", &self.ready.len())
            .field("guild", &self.guild.len())
            .finish()
    }
}
