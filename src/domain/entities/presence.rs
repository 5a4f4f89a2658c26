//! Presence entity and store contract.
//!
//! Presences are keyed by (guild, user). Presences delivered outside any
//! guild (friends, on resync) are stored under the null guild ID.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Snowflake;
use crate::shared::error::StoreError;

/// User status as reported by presence updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Offline,
    Online,
    Idle,
    Dnd,
    Invisible,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Dnd => "dnd",
            Self::Invisible => "invisible",
        }
    }

    /// Check if the user is shown as online (online, idle, or dnd).
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online | Self::Idle | Self::Dnd)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Only the user ID is guaranteed in a presence payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUser {
    pub id: Snowflake,
}

/// A user activity (game, stream, custom status).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Represents a user's presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub user: PresenceUser,

    /// Guild this presence was reported for (null for global presences)
    #[serde(default)]
    pub guild_id: Snowflake,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Presence {
    pub fn new(user_id: impl Into<Snowflake>, status: Status) -> Self {
        Self {
            user: PresenceUser { id: user_id.into() },
            status,
            ..Default::default()
        }
    }

    pub fn user_id(&self) -> Snowflake {
        self.user.id
    }
}

/// Store operations for presences.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    async fn presence(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<Option<Presence>, StoreError>;

    async fn presences(&self, guild_id: Snowflake) -> Result<Vec<Presence>, StoreError>;

    /// Insert or replace a presence under `guild_id`.
    async fn presence_set(&self, guild_id: Snowflake, presence: Presence) -> Result<(), StoreError>;

    async fn presence_remove(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<(), StoreError>;
}
