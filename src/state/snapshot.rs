//! Session Snapshot
//!
//! Session-scoped state that is not addressable through the store: the
//! current user's settings, per-guild notification settings and notes.
//! Rebuilt wholesale on every ready payload, then patched by the narrow
//! settings events.

use std::collections::HashMap;

use crate::domain::{Snowflake, UserGuildSettings, UserSettings};
use crate::gateway::Ready;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    session_id: String,
    settings: Option<UserSettings>,
    guild_settings: Vec<UserGuildSettings>,
    notes: HashMap<Snowflake, String>,
}

impl Snapshot {
    pub fn from_ready(ready: &Ready) -> Self {
        Self {
            session_id: ready.session_id.clone(),
            settings: ready.user_settings.clone(),
            guild_settings: ready.user_guild_settings.clone(),
            notes: ready.notes.clone(),
        }
    }

    /// Session ID of the ready payload this snapshot was built from.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn settings(&self) -> Option<&UserSettings> {
        self.settings.as_ref()
    }

    pub fn guild_settings(&self, guild_id: Snowflake) -> Option<&UserGuildSettings> {
        self.guild_settings.iter().find(|s| s.guild_id == guild_id)
    }

    pub fn all_guild_settings(&self) -> &[UserGuildSettings] {
        &self.guild_settings
    }

    pub fn note(&self, user_id: Snowflake) -> Option<&str> {
        self.notes.get(&user_id).map(String::as_str)
    }

    pub fn set_settings(&mut self, settings: UserSettings) {
        self.settings = Some(settings);
    }

    /// Replace the settings of an already known guild.
    ///
    /// Returns false when no entry exists; nothing is inserted then.
    pub fn update_guild_settings(&mut self, settings: &UserGuildSettings) -> bool {
        match self.guild_settings.iter_mut().find(|s| s.guild_id == settings.guild_id) {
            Some(existing) => {
                *existing = settings.clone();
                true
            }
            None => false,
        }
    }

    pub fn set_note(&mut self, user_id: Snowflake, note: String) {
        self.notes.insert(user_id, note);
    }
}
