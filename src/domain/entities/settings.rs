//! Account settings delivered with the ready payload.
//!
//! These are not addressable entities and never go through the store.

use serde::{Deserialize, Serialize};

use crate::domain::Snowflake;

/// Client-wide settings of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub theme: String,

    #[serde(default)]
    pub locale: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub developer_mode: bool,

    #[serde(default)]
    pub message_display_compact: bool,

    /// Guild IDs in sidebar order
    #[serde(default)]
    pub guild_positions: Vec<Snowflake>,
}

/// Per-guild notification settings of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGuildSettings {
    pub guild_id: Snowflake,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub suppress_everyone: bool,

    #[serde(default)]
    pub mobile_push: bool,

    /// 0 = all messages, 1 = only mentions, 2 = nothing
    #[serde(default)]
    pub message_notifications: u8,

    #[serde(default)]
    pub channel_overrides: Vec<ChannelOverride>,
}

/// Notification override for one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelOverride {
    pub channel_id: Snowflake,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub message_notifications: u8,
}
