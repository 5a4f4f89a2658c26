//! Guild entity and store contract.
//!
//! A guild is the top-level community: it owns channels, members and roles.
//! The guild record itself carries its roles and emojis, which is how the
//! gateway delivers them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Emoji, Role};
use crate::domain::Snowflake;
use crate::shared::error::StoreError;

/// Represents a guild (community).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    /// Snowflake ID
    pub id: Snowflake,

    /// Guild name (2-100 characters)
    #[serde(default)]
    pub name: String,

    /// Icon hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// User ID of the guild owner
    #[serde(default)]
    pub owner_id: Snowflake,

    /// Guild description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Roles defined in the guild
    #[serde(default)]
    pub roles: Vec<Role>,

    /// Custom emojis defined in the guild; `None` when the payload omits them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emojis: Option<Vec<Emoji>>,
}

impl Guild {
    pub fn new(id: impl Into<Snowflake>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check if a user is the owner of this guild.
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }

    /// Find a role by ID.
    pub fn role(&self, role_id: Snowflake) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == role_id)
    }
}

/// Store operations for guild records.
#[async_trait]
pub trait GuildStore: Send + Sync {
    async fn guild(&self, id: Snowflake) -> Result<Option<Guild>, StoreError>;

    async fn guilds(&self) -> Result<Vec<Guild>, StoreError>;

    /// Insert or replace a guild.
    async fn guild_set(&self, guild: Guild) -> Result<(), StoreError>;

    /// Remove a guild and everything scoped to it.
    async fn guild_remove(&self, id: Snowflake) -> Result<(), StoreError>;
}
