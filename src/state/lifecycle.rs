//! Guild Lifecycle
//!
//! Tells apart the reasons a guild shows up or disappears. A guild create
//! can mean the guild finished loading after ready, came back from an
//! outage, or was just joined; a guild delete can mean an outage or leaving.

use std::collections::HashSet;

use crate::domain::Snowflake;
use crate::gateway::{GuildCreate, GuildDelete, Ready};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuildLifecycle {
    /// Delivered with ready, or the belated create of a guild ready listed as unavailable
    Ready,
    /// Back from an outage
    Available,
    /// The user joined it during this session
    Joined,
    /// Went into an outage
    Unavailable,
    /// The user left or was removed
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuildLifecycleEvent {
    pub guild_id: Snowflake,
    pub kind: GuildLifecycle,
}

impl GuildLifecycleEvent {
    fn new(guild_id: Snowflake, kind: GuildLifecycle) -> Self {
        Self { guild_id, kind }
    }
}

/// Tracks which guilds are in an outage or still loading.
#[derive(Debug, Default)]
pub struct GuildTracker {
    unavailable: HashSet<Snowflake>,
    unready: HashSet<Snowflake>,
}

impl GuildTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session. Guilds ready lists as unavailable are expected
    /// to arrive later through guild creates.
    pub fn ready(&mut self, ready: &Ready) -> Vec<GuildLifecycleEvent> {
        self.unavailable.clear();
        self.unready.clear();

        let mut events = Vec::new();
        for guild in &ready.guilds {
            if guild.unavailable {
                self.unready.insert(guild.id());
            } else {
                events.push(GuildLifecycleEvent::new(guild.id(), GuildLifecycle::Ready));
            }
        }
        events
    }

    pub fn guild_create(&mut self, guild: &GuildCreate) -> GuildLifecycleEvent {
        let id = guild.id();

        let kind = if guild.unavailable {
            self.unavailable.insert(id);
            GuildLifecycle::Unavailable
        } else if self.unavailable.remove(&id) {
            GuildLifecycle::Available
        } else if self.unready.remove(&id) {
            GuildLifecycle::Ready
        } else {
            GuildLifecycle::Joined
        };

        GuildLifecycleEvent::new(id, kind)
    }

    pub fn guild_delete(&mut self, guild: &GuildDelete) -> GuildLifecycleEvent {
        let kind = if guild.unavailable {
            self.unavailable.insert(guild.id);
            GuildLifecycle::Unavailable
        } else {
            self.unavailable.remove(&guild.id);
            self.unready.remove(&guild.id);
            GuildLifecycle::Left
        };

        GuildLifecycleEvent::new(guild.id, kind)
    }

    pub fn is_unavailable(&self, guild_id: Snowflake) -> bool {
        self.unavailable.contains(&guild_id)
    }
}
