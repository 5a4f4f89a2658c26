//! Message entity and store contract.
//!
//! Messages are keyed by (channel, message). The store decides how many
//! messages it keeps per channel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{find_reaction, Emoji, Member, Reaction, User};
use crate::domain::Snowflake;
use crate::shared::error::StoreError;

/// Message types as numbered by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "u8", into = "u8")]
pub enum MessageType {
    /// A regular user message
    #[default]
    Default,
    /// A recipient was added to a group DM
    RecipientAdd,
    /// A recipient was removed from a group DM
    RecipientRemove,
    /// A voice/video call was started
    Call,
    /// Channel name was changed
    ChannelNameChange,
    /// Channel icon was changed
    ChannelIconChange,
    /// A message was pinned
    ChannelPinnedMessage,
    /// A new member joined the guild
    GuildMemberJoin,
    /// A reply to another message
    Reply,
    Other(u8),
}

impl From<u8> for MessageType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Default,
            1 => Self::RecipientAdd,
            2 => Self::RecipientRemove,
            3 => Self::Call,
            4 => Self::ChannelNameChange,
            5 => Self::ChannelIconChange,
            6 => Self::ChannelPinnedMessage,
            7 => Self::GuildMemberJoin,
            19 => Self::Reply,
            other => Self::Other(other),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Default => 0,
            MessageType::RecipientAdd => 1,
            MessageType::RecipientRemove => 2,
            MessageType::Call => 3,
            MessageType::ChannelNameChange => 4,
            MessageType::ChannelIconChange => 5,
            MessageType::ChannelPinnedMessage => 6,
            MessageType::GuildMemberJoin => 7,
            MessageType::Reply => 19,
            MessageType::Other(other) => other,
        }
    }
}

impl MessageType {
    /// Check if this is a system message type.
    pub fn is_system(&self) -> bool {
        !matches!(self, Self::Default | Self::Reply)
    }
}

/// Represents a message in a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID
    pub id: Snowflake,

    /// Channel ID where the message was sent
    pub channel_id: Snowflake,

    /// Guild ID, absent for direct messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,

    /// Author
    #[serde(default)]
    pub author: User,

    /// Guild member data of the author. Its `user` field is not sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,

    /// Message content
    #[serde(default)]
    pub content: String,

    /// Type of message
    #[serde(rename = "type", default)]
    pub kind: MessageType,

    /// When the message was sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// When the message was last edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_timestamp: Option<DateTime<Utc>>,

    /// Whether message is pinned
    #[serde(default)]
    pub pinned: bool,

    /// Aggregated reactions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
}

impl Message {
    pub fn new(id: impl Into<Snowflake>, channel_id: impl Into<Snowflake>, author: User) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            author,
            ..Default::default()
        }
    }

    /// Check if this message has been edited.
    pub fn is_edited(&self) -> bool {
        self.edited_timestamp.is_some()
    }

    /// The reaction record for `emoji`, if any.
    pub fn reaction(&self, emoji: &Emoji) -> Option<&Reaction> {
        find_reaction(&self.reactions, emoji).map(|i| &self.reactions[i])
    }
}

/// Store operations for messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn message(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<Option<Message>, StoreError>;

    /// Cached messages of a channel, oldest first.
    async fn messages(&self, channel_id: Snowflake) -> Result<Vec<Message>, StoreError>;

    /// Insert or replace a message.
    async fn message_set(&self, message: Message) -> Result<(), StoreError>;

    async fn message_remove(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<(), StoreError>;
}
