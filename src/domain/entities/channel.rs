//! Channel entity and store contract.
//!
//! Guild channels carry their guild ID; direct message channels do not.
//! Guild payloads omit the guild ID on nested channels, so the reconciler
//! fills it in before storing them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::User;
use crate::domain::Snowflake;
use crate::shared::error::StoreError;

/// Channel types as numbered by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelType {
    /// A text channel within a guild
    #[default]
    Text,
    /// A direct message between two users
    Dm,
    /// A voice channel within a guild
    Voice,
    /// A direct message between multiple users
    GroupDm,
    /// A category that contains channels
    Category,
    /// A type this client does not model
    Unknown(u8),
}

impl From<u8> for ChannelType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Text,
            1 => Self::Dm,
            2 => Self::Voice,
            3 => Self::GroupDm,
            4 => Self::Category,
            other => Self::Unknown(other),
        }
    }
}

impl From<ChannelType> for u8 {
    fn from(value: ChannelType) -> Self {
        match value {
            ChannelType::Text => 0,
            ChannelType::Dm => 1,
            ChannelType::Voice => 2,
            ChannelType::GroupDm => 3,
            ChannelType::Category => 4,
            ChannelType::Unknown(other) => other,
        }
    }
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Dm => "dm",
            Self::Voice => "voice",
            Self::GroupDm => "group_dm",
            Self::Category => "category",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Snowflake ID
    pub id: Snowflake,

    /// Guild ID (None for DM channels and for channels nested in a guild payload)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,

    /// Channel type
    #[serde(rename = "type", default)]
    pub kind: ChannelType,

    /// Channel name (None for DMs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Channel topic/description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Sorting position within category or guild
    #[serde(default)]
    pub position: i32,

    /// Parent category ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Snowflake>,

    /// Whether the channel is age-restricted
    #[serde(default)]
    pub nsfw: bool,

    /// ID of the last message sent, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<Snowflake>,

    /// Recipients of a DM channel
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<User>,
}

impl Channel {
    /// A guild text channel.
    pub fn text(id: impl Into<Snowflake>, guild_id: impl Into<Snowflake>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            guild_id: Some(guild_id.into()),
            kind: ChannelType::Text,
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// A direct message channel with one recipient.
    pub fn direct(id: impl Into<Snowflake>, recipient: User) -> Self {
        Self {
            id: id.into(),
            kind: ChannelType::Dm,
            recipients: vec![recipient],
            ..Default::default()
        }
    }

    /// Check if this is a DM channel (direct or group).
    pub fn is_dm(&self) -> bool {
        matches!(self.kind, ChannelType::Dm | ChannelType::GroupDm)
    }

    /// The guild this channel belongs to, ignoring a null ID.
    pub fn guild(&self) -> Option<Snowflake> {
        self.guild_id.filter(Snowflake::is_valid)
    }
}

/// Store operations for channels.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    async fn channel(&self, id: Snowflake) -> Result<Option<Channel>, StoreError>;

    /// All channels of a guild.
    async fn channels(&self, guild_id: Snowflake) -> Result<Vec<Channel>, StoreError>;

    /// All channels that belong to no guild.
    async fn private_channels(&self) -> Result<Vec<Channel>, StoreError>;

    /// Insert or replace a channel.
    async fn channel_set(&self, channel: Channel) -> Result<(), StoreError>;

    async fn channel_remove(&self, channel: &Channel) -> Result<(), StoreError>;
}
