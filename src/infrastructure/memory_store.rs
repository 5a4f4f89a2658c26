//! In-memory Store
//!
//! [`Store`] implementation backed by concurrent maps. Roles and emojis live
//! inside their guild record, so writing them for an unknown guild fails.
//! Every other entity can be written before its guild is known.

use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::domain::{
    Channel, ChannelStore, Emoji, EmojiStore, Guild, GuildStore, Member, MemberStore, Message,
    MessageStore, Presence, PresenceStore, Role, RoleStore, SelfStore, Snowflake, Store,
    StoreResetter, User, VoiceState, VoiceStateStore,
};
use crate::shared::error::StoreError;

/// Default number of messages kept per channel.
pub const DEFAULT_MAX_MESSAGES: usize = 100;

pub struct MemoryStore {
    max_messages: usize,
    me: RwLock<Option<User>>,
    guilds: DashMap<Snowflake, Guild>,
    channels: DashMap<Snowflake, Channel>,
    /// guild -> user -> member
    members: DashMap<Snowflake, BTreeMap<Snowflake, Member>>,
    /// guild -> user -> presence; NULL guild holds global presences
    presences: DashMap<Snowflake, BTreeMap<Snowflake, Presence>>,
    voice_states: DashMap<Snowflake, BTreeMap<Snowflake, VoiceState>>,
    /// channel -> messages, oldest first
    messages: DashMap<Snowflake, VecDeque<Message>>,
}

impl MemoryStore {
    pub fn new(max_messages: usize) -> Self {
        Self {
            max_messages,
            me: RwLock::new(None),
            guilds: DashMap::new(),
            channels: DashMap::new(),
            members: DashMap::new(),
            presences: DashMap::new(),
            voice_states: DashMap::new(),
            messages: DashMap::new(),
        }
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    fn clear(&self) {
        *self.me.write() = None;
        self.guilds.clear();
        self.channels.clear();
        self.members.clear();
        self.presences.clear();
        self.voice_states.clear();
        self.messages.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("max_messages", &self.max_messages)
            .field("guilds", &self.guilds.len())
            .field("channels", &self.channels.len())
            .finish_non_exhaustive()
    }
}

impl Store for MemoryStore {
    fn resetter(&self) -> Option<&dyn StoreResetter> {
        Some(self)
    }
}

#[async_trait]
impl StoreResetter for MemoryStore {
    async fn reset(&self) -> Result<(), StoreError> {
        self.clear();
        Ok(())
    }
}

#[async_trait]
impl SelfStore for MemoryStore {
    async fn me(&self) -> Result<Option<User>, StoreError> {
        Ok(self.me.read().clone())
    }

    async fn myself_set(&self, user: User) -> Result<(), StoreError> {
        *self.me.write() = Some(user);
        Ok(())
    }
}

#[async_trait]
impl GuildStore for MemoryStore {
    async fn guild(&self, id: Snowflake) -> Result<Option<Guild>, StoreError> {
        Ok(self.guilds.get(&id).map(|g| g.value().clone()))
    }

    async fn guilds(&self) -> Result<Vec<Guild>, StoreError> {
        let mut guilds: Vec<Guild> = self.guilds.iter().map(|g| g.value().clone()).collect();
        guilds.sort_by_key(|g| g.id);
        Ok(guilds)
    }

    async fn guild_set(&self, guild: Guild) -> Result<(), StoreError> {
        self.guilds.insert(guild.id, guild);
        Ok(())
    }

    async fn guild_remove(&self, id: Snowflake) -> Result<(), StoreError> {
        self.guilds.remove(&id).ok_or(StoreError::NotFound("guild"))?;

        self.members.remove(&id);
        self.presences.remove(&id);
        self.voice_states.remove(&id);

        let channel_ids: Vec<Snowflake> = self
            .channels
            .iter()
            .filter(|c| c.guild() == Some(id))
            .map(|c| c.id)
            .collect();
        for channel_id in channel_ids {
            self.channels.remove(&channel_id);
            self.messages.remove(&channel_id);
        }

        Ok(())
    }
}

#[async_trait]
impl ChannelStore for MemoryStore {
    async fn channel(&self, id: Snowflake) -> Result<Option<Channel>, StoreError> {
        Ok(self.channels.get(&id).map(|c| c.value().clone()))
    }

    async fn channels(&self, guild_id: Snowflake) -> Result<Vec<Channel>, StoreError> {
        let mut channels: Vec<Channel> = self
            .channels
            .iter()
            .filter(|c| c.guild() == Some(guild_id))
            .map(|c| c.value().clone())
            .collect();
        channels.sort_by_key(|c| (c.position, c.id));
        Ok(channels)
    }

    async fn private_channels(&self) -> Result<Vec<Channel>, StoreError> {
        let mut channels: Vec<Channel> = self
            .channels
            .iter()
            .filter(|c| c.guild().is_none())
            .map(|c| c.value().clone())
            .collect();
        channels.sort_by_key(|c| c.id);
        Ok(channels)
    }

    async fn channel_set(&self, channel: Channel) -> Result<(), StoreError> {
        self.channels.insert(channel.id, channel);
        Ok(())
    }

    async fn channel_remove(&self, channel: &Channel) -> Result<(), StoreError> {
        self.channels.remove(&channel.id).ok_or(StoreError::NotFound("channel"))?;
        self.messages.remove(&channel.id);
        Ok(())
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<Option<Member>, StoreError> {
        Ok(self
            .members
            .get(&guild_id)
            .and_then(|members| members.get(&user_id).cloned()))
    }

    async fn members(&self, guild_id: Snowflake) -> Result<Vec<Member>, StoreError> {
        Ok(self
            .members
            .get(&guild_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn member_set(&self, guild_id: Snowflake, member: Member) -> Result<(), StoreError> {
        self.members
            .entry(guild_id)
            .or_default()
            .insert(member.user.id, member);
        Ok(())
    }

    async fn member_remove(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<(), StoreError> {
        self.members
            .get_mut(&guild_id)
            .and_then(|mut members| members.remove(&user_id))
            .map(|_| ())
            .ok_or(StoreError::NotFound("member"))
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn role(&self, guild_id: Snowflake, role_id: Snowflake) -> Result<Option<Role>, StoreError> {
        Ok(self
            .guilds
            .get(&guild_id)
            .and_then(|guild| guild.role(role_id).cloned()))
    }

    async fn roles(&self, guild_id: Snowflake) -> Result<Vec<Role>, StoreError> {
        Ok(self
            .guilds
            .get(&guild_id)
            .map(|guild| guild.roles.clone())
            .unwrap_or_default())
    }

    async fn role_set(&self, guild_id: Snowflake, role: Role) -> Result<(), StoreError> {
        let mut guild = self.guilds.get_mut(&guild_id).ok_or(StoreError::MissingParent {
            kind: "guild",
            id: guild_id,
        })?;

        match guild.roles.iter_mut().find(|r| r.id == role.id) {
            Some(existing) => *existing = role,
            None => guild.roles.push(role),
        }
        Ok(())
    }

    async fn role_remove(&self, guild_id: Snowflake, role_id: Snowflake) -> Result<(), StoreError> {
        let mut guild = self.guilds.get_mut(&guild_id).ok_or(StoreError::MissingParent {
            kind: "guild",
            id: guild_id,
        })?;

        let index = guild
            .roles
            .iter()
            .position(|r| r.id == role_id)
            .ok_or(StoreError::NotFound("role"))?;
        guild.roles.remove(index);
        Ok(())
    }
}

#[async_trait]
impl EmojiStore for MemoryStore {
    async fn emoji(&self, guild_id: Snowflake, emoji_id: Snowflake) -> Result<Option<Emoji>, StoreError> {
        Ok(self
            .guilds
            .get(&guild_id)
            .and_then(|guild| guild.emojis.iter().flatten().find(|e| e.id == emoji_id).cloned()))
    }

    async fn emojis(&self, guild_id: Snowflake) -> Result<Vec<Emoji>, StoreError> {
        Ok(self
            .guilds
            .get(&guild_id)
            .and_then(|guild| guild.emojis.clone())
            .unwrap_or_default())
    }

    async fn emoji_set(&self, guild_id: Snowflake, emojis: Vec<Emoji>) -> Result<(), StoreError> {
        let mut guild = self.guilds.get_mut(&guild_id).ok_or(StoreError::MissingParent {
            kind: "guild",
            id: guild_id,
        })?;
        guild.emojis = Some(emojis);
        Ok(())
    }
}

#[async_trait]
impl PresenceStore for MemoryStore {
    async fn presence(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<Option<Presence>, StoreError> {
        Ok(self
            .presences
            .get(&guild_id)
            .and_then(|presences| presences.get(&user_id).cloned()))
    }

    async fn presences(&self, guild_id: Snowflake) -> Result<Vec<Presence>, StoreError> {
        Ok(self
            .presences
            .get(&guild_id)
            .map(|presences| presences.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn presence_set(&self, guild_id: Snowflake, presence: Presence) -> Result<(), StoreError> {
        self.presences
            .entry(guild_id)
            .or_default()
            .insert(presence.user_id(), presence);
        Ok(())
    }

    async fn presence_remove(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<(), StoreError> {
        self.presences
            .get_mut(&guild_id)
            .and_then(|mut presences| presences.remove(&user_id))
            .map(|_| ())
            .ok_or(StoreError::NotFound("presence"))
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn message(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<Option<Message>, StoreError> {
        Ok(self
            .messages
            .get(&channel_id)
            .and_then(|messages| messages.iter().find(|m| m.id == message_id).cloned()))
    }

    async fn messages(&self, channel_id: Snowflake) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .messages
            .get(&channel_id)
            .map(|messages| messages.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn message_set(&self, message: Message) -> Result<(), StoreError> {
        let mut messages = self.messages.entry(message.channel_id).or_default();

        if let Some(existing) = messages.iter_mut().find(|m| m.id == message.id) {
            *existing = message;
            return Ok(());
        }

        messages.push_back(message);
        while messages.len() > self.max_messages {
            messages.pop_front();
        }
        Ok(())
    }

    async fn message_remove(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<(), StoreError> {
        let mut messages = self
            .messages
            .get_mut(&channel_id)
            .ok_or(StoreError::NotFound("message"))?;

        let index = messages
            .iter()
            .position(|m| m.id == message_id)
            .ok_or(StoreError::NotFound("message"))?;
        messages.remove(index);
        Ok(())
    }
}

#[async_trait]
impl VoiceStateStore for MemoryStore {
    async fn voice_state(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<Option<VoiceState>, StoreError> {
        Ok(self
            .voice_states
            .get(&guild_id)
            .and_then(|states| states.get(&user_id).cloned()))
    }

    async fn voice_states(&self, guild_id: Snowflake) -> Result<Vec<VoiceState>, StoreError> {
        Ok(self
            .voice_states
            .get(&guild_id)
            .map(|states| states.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn voice_state_set(&self, guild_id: Snowflake, state: VoiceState) -> Result<(), StoreError> {
        self.voice_states
            .entry(guild_id)
            .or_default()
            .insert(state.user_id, state);
        Ok(())
    }

    async fn voice_state_remove(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<(), StoreError> {
        self.voice_states
            .get_mut(&guild_id)
            .and_then(|mut states| states.remove(&user_id))
            .map(|_| ())
            .ok_or(StoreError::NotFound("voice state"))
    }
}
