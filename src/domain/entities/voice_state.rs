//! Voice State entity and store contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Snowflake;
use crate::shared::error::StoreError;

/// A user's voice connection within a guild.
///
/// A null `channel_id` means the user left voice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceState {
    #[serde(default)]
    pub guild_id: Snowflake,

    #[serde(default)]
    pub channel_id: Snowflake,

    pub user_id: Snowflake,

    #[serde(default)]
    pub session_id: String,

    #[serde(default)]
    pub deaf: bool,
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub self_deaf: bool,
    #[serde(default)]
    pub self_mute: bool,
    #[serde(default)]
    pub suppress: bool,
}

impl VoiceState {
    pub fn new(guild_id: impl Into<Snowflake>, channel_id: impl Into<Snowflake>, user_id: impl Into<Snowflake>) -> Self {
        Self {
            guild_id: guild_id.into(),
            channel_id: channel_id.into(),
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    /// Whether the user is in a voice channel.
    pub fn is_connected(&self) -> bool {
        self.channel_id.is_valid()
    }
}

/// Store operations for voice states.
#[async_trait]
pub trait VoiceStateStore: Send + Sync {
    async fn voice_state(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<Option<VoiceState>, StoreError>;

    async fn voice_states(&self, guild_id: Snowflake) -> Result<Vec<VoiceState>, StoreError>;

    async fn voice_state_set(&self, guild_id: Snowflake, state: VoiceState) -> Result<(), StoreError>;

    async fn voice_state_remove(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<(), StoreError>;
}
