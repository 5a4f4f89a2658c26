//! Emoji entity and store contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Snowflake;
use crate::shared::error::StoreError;

/// A custom guild emoji or a unicode emoji.
///
/// Unicode emojis have a null ID and carry the character itself as the name.
/// Reactions are matched on the (id, name) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    #[serde(default)]
    pub id: Snowflake,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub animated: bool,
}

impl Emoji {
    /// A unicode emoji.
    pub fn unicode(name: impl Into<String>) -> Self {
        Self {
            id: Snowflake::NULL,
            name: name.into(),
            animated: false,
        }
    }

    /// A custom guild emoji.
    pub fn custom(id: impl Into<Snowflake>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            animated: false,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.id.is_valid()
    }

    /// Whether both emojis denote the same reaction.
    pub fn same_as(&self, other: &Emoji) -> bool {
        self.id == other.id && self.name == other.name
    }
}

/// Store operations for a guild's emoji set.
#[async_trait]
pub trait EmojiStore: Send + Sync {
    async fn emoji(&self, guild_id: Snowflake, emoji_id: Snowflake) -> Result<Option<Emoji>, StoreError>;

    async fn emojis(&self, guild_id: Snowflake) -> Result<Vec<Emoji>, StoreError>;

    /// Replace the guild's whole emoji set.
    async fn emoji_set(&self, guild_id: Snowflake, emojis: Vec<Emoji>) -> Result<(), StoreError>;
}
