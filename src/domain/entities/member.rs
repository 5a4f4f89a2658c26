//! Guild Member entity and store contract.
//!
//! Members are keyed by (guild, user). The gateway omits the guild ID from
//! the member object itself, so every store call passes it alongside.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::domain::Snowflake;
use crate::shared::error::StoreError;

/// Represents a user's membership in a guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The user this membership belongs to
    #[serde(default)]
    pub user: User,

    /// Guild-specific nickname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,

    /// IDs of roles assigned to this member
    #[serde(default, rename = "roles")]
    pub role_ids: Vec<Snowflake>,

    /// When the user joined the guild
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,

    /// When the user started boosting the guild
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_since: Option<DateTime<Utc>>,

    /// Whether the user is deafened in voice channels
    #[serde(default)]
    pub deaf: bool,

    /// Whether the user is muted in voice channels
    #[serde(default)]
    pub mute: bool,
}

impl Member {
    pub fn new(user: User) -> Self {
        Self {
            user,
            ..Default::default()
        }
    }

    /// Check if the member has a specific role.
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Nickname, falling back to the user's display name.
    pub fn display_name(&self) -> &str {
        self.nick.as_deref().unwrap_or_else(|| self.user.display_name())
    }
}

/// Store operations for guild members.
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<Option<Member>, StoreError>;

    async fn members(&self, guild_id: Snowflake) -> Result<Vec<Member>, StoreError>;

    /// Insert or replace a member, keyed by `member.user.id`.
    async fn member_set(&self, guild_id: Snowflake, member: Member) -> Result<(), StoreError>;

    async fn member_remove(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<(), StoreError>;
}
