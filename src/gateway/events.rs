//! Gateway Dispatch Events
//!
//! Typed payloads of every dispatch the state engine understands, and the
//! closed [`Event`] union over them. The union is declared once through
//! `gateway_events!`, which also derives the dispatch names, so a kind can't
//! be added to one without the other.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Channel, Emoji, Guild, Member, Message, Presence, Role, Snowflake, User, UserGuildSettings,
    UserSettings, VoiceState,
};

macro_rules! gateway_events {
    ($( $(#[$meta:meta])* $name:literal => $variant:ident $(($payload:ty))? ),* $(,)?) => {
        /// A decoded gateway dispatch.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "t", content = "d")]
        pub enum Event {
            $(
                $(#[$meta])*
                #[serde(rename = $name)]
                $variant $(($payload))?,
            )*
            /// A dispatch this client does not know about. Carries its name.
            #[serde(skip)]
            Unknown(String),
        }

        impl Event {
            /// Dispatch names of every known kind.
            pub const KINDS: &'static [&'static str] = &[$($name),*];

            /// Get the dispatch name of this event.
            pub fn event_name(&self) -> &str {
                match self {
                    $( gateway_events!(@pattern $variant $(($payload))?) => $name, )*
                    Event::Unknown(name) => name,
                }
            }
        }
    };
    (@pattern $variant:ident ($payload:ty)) => { Event::$variant(_) };
    (@pattern $variant:ident) => { Event::$variant };
}

gateway_events! {
    /// Full state on (re)connect
    "READY" => Ready(Box<Ready>),
    /// Session resumed; the payload only carries gateway trace data
    "RESUMED" => Resumed(serde_json::Value),

    // Guild events
    "GUILD_CREATE" => GuildCreate(Box<GuildCreate>),
    "GUILD_UPDATE" => GuildUpdate(Guild),
    "GUILD_DELETE" => GuildDelete(GuildDelete),
    "GUILD_MEMBER_ADD" => GuildMemberAdd(GuildMemberAdd),
    "GUILD_MEMBER_UPDATE" => GuildMemberUpdate(GuildMemberUpdate),
    "GUILD_MEMBER_REMOVE" => GuildMemberRemove(GuildMemberRemove),
    "GUILD_MEMBERS_CHUNK" => GuildMembersChunk(GuildMembersChunk),
    "GUILD_ROLE_CREATE" => GuildRoleCreate(GuildRole),
    "GUILD_ROLE_UPDATE" => GuildRoleUpdate(GuildRole),
    "GUILD_ROLE_DELETE" => GuildRoleDelete(GuildRoleDelete),
    "GUILD_EMOJIS_UPDATE" => GuildEmojisUpdate(GuildEmojisUpdate),

    // Channel events
    "CHANNEL_CREATE" => ChannelCreate(Channel),
    "CHANNEL_UPDATE" => ChannelUpdate(Channel),
    "CHANNEL_DELETE" => ChannelDelete(Channel),
    "CHANNEL_PINS_UPDATE" => ChannelPinsUpdate(ChannelPinsUpdate),

    // Message events
    "MESSAGE_CREATE" => MessageCreate(Message),
    "MESSAGE_UPDATE" => MessageUpdate(Message),
    "MESSAGE_DELETE" => MessageDelete(MessageDelete),
    "MESSAGE_DELETE_BULK" => MessageDeleteBulk(MessageDeleteBulk),
    "MESSAGE_REACTION_ADD" => MessageReactionAdd(MessageReactionAdd),
    "MESSAGE_REACTION_REMOVE" => MessageReactionRemove(MessageReactionRemove),
    "MESSAGE_REACTION_REMOVE_ALL" => MessageReactionRemoveAll(MessageReactionRemoveAll),
    "MESSAGE_REACTION_REMOVE_EMOJI" => MessageReactionRemoveEmoji(MessageReactionRemoveEmoji),

    // Presence events
    "PRESENCE_UPDATE" => PresenceUpdate(Presence),
    "PRESENCES_REPLACE" => PresencesReplace(Vec<Presence>),
    "SESSIONS_REPLACE" => SessionsReplace(Vec<serde_json::Value>),
    "TYPING_START" => TypingStart(TypingStart),

    // Current user events
    "USER_GUILD_SETTINGS_UPDATE" => UserGuildSettingsUpdate(UserGuildSettings),
    "USER_SETTINGS_UPDATE" => UserSettingsUpdate(UserSettings),
    "USER_NOTE_UPDATE" => UserNoteUpdate(UserNoteUpdate),
    "USER_UPDATE" => UserUpdate(User),

    // Voice events
    "VOICE_STATE_UPDATE" => VoiceStateUpdate(VoiceState),
}

impl Event {
    /// Decode a dispatch from its name and data.
    ///
    /// Names outside [`Event::KINDS`] become [`Event::Unknown`] rather than
    /// an error; malformed data for a known name is an error.
    pub fn from_dispatch(name: &str, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        if !Self::KINDS.contains(&name) {
            return Ok(Event::Unknown(name.to_owned()));
        }
        serde_json::from_value(serde_json::json!({ "t": name, "d": data }))
    }

    /// Get the guild ID this event belongs to, when it names one.
    pub fn guild_id(&self) -> Option<Snowflake> {
        match self {
            Event::GuildCreate(e) => Some(e.guild.id),
            Event::GuildUpdate(e) => Some(e.id),
            Event::GuildDelete(e) => Some(e.id),
            Event::GuildMemberAdd(e) => Some(e.guild_id),
            Event::GuildMemberUpdate(e) => Some(e.guild_id),
            Event::GuildMemberRemove(e) => Some(e.guild_id),
            Event::GuildMembersChunk(e) => Some(e.guild_id),
            Event::GuildRoleCreate(e) | Event::GuildRoleUpdate(e) => Some(e.guild_id),
            Event::GuildRoleDelete(e) => Some(e.guild_id),
            Event::GuildEmojisUpdate(e) => Some(e.guild_id),
            Event::ChannelCreate(c) | Event::ChannelUpdate(c) | Event::ChannelDelete(c) => c.guild(),
            Event::ChannelPinsUpdate(e) => e.guild_id,
            Event::MessageCreate(m) | Event::MessageUpdate(m) => m.guild_id,
            Event::MessageDelete(e) => e.guild_id,
            Event::MessageDeleteBulk(e) => e.guild_id,
            Event::MessageReactionAdd(e) => e.guild_id,
            Event::MessageReactionRemove(e) => e.guild_id,
            Event::MessageReactionRemoveAll(e) => e.guild_id,
            Event::MessageReactionRemoveEmoji(e) => e.guild_id,
            Event::PresenceUpdate(p) => Some(p.guild_id).filter(Snowflake::is_valid),
            Event::TypingStart(e) => e.guild_id,
            Event::UserGuildSettingsUpdate(s) => Some(s.guild_id),
            Event::VoiceStateUpdate(v) => Some(v.guild_id).filter(Snowflake::is_valid),
            Event::Ready(_)
            | Event::Resumed(_)
            | Event::PresencesReplace(_)
            | Event::SessionsReplace(_)
            | Event::UserSettingsUpdate(_)
            | Event::UserNoteUpdate(_)
            | Event::UserUpdate(_)
            | Event::Unknown(_) => None,
        }
    }
}

/// Ready payload (dispatch READY).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ready {
    /// Gateway protocol version
    #[serde(default)]
    pub v: u8,

    /// The current user
    pub user: User,

    pub session_id: String,

    /// Guilds the user is in, possibly marked unavailable
    #[serde(default)]
    pub guilds: Vec<GuildCreate>,

    #[serde(default)]
    pub private_channels: Vec<Channel>,

    /// Presences of friends, outside any guild
    #[serde(default)]
    pub presences: Vec<Presence>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_settings: Option<UserSettings>,

    #[serde(default)]
    pub user_guild_settings: Vec<UserGuildSettings>,

    /// User notes keyed by target user ID
    #[serde(default)]
    pub notes: HashMap<Snowflake, String>,
}

/// A guild with everything delivered alongside it on join or connect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildCreate {
    #[serde(flatten)]
    pub guild: Guild,

    /// Set when the guild is in an outage; nothing else is usable then
    #[serde(default)]
    pub unavailable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub member_count: u64,

    #[serde(default)]
    pub members: Vec<Member>,

    /// Channels of the guild, without their guild ID
    #[serde(default)]
    pub channels: Vec<Channel>,

    #[serde(default)]
    pub presences: Vec<Presence>,

    #[serde(default)]
    pub voice_states: Vec<VoiceState>,
}

impl GuildCreate {
    pub fn new(guild: Guild) -> Self {
        Self {
            guild,
            ..Default::default()
        }
    }

    /// A placeholder for a guild in an outage.
    pub fn unavailable(id: impl Into<Snowflake>) -> Self {
        Self {
            guild: Guild {
                id: id.into(),
                ..Default::default()
            },
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn id(&self) -> Snowflake {
        self.guild.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildDelete {
    pub id: Snowflake,

    /// Set when the guild went into an outage instead of being left
    #[serde(default)]
    pub unavailable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildMemberAdd {
    pub guild_id: Snowflake,

    #[serde(flatten)]
    pub member: Member,
}

/// Partial member update.
///
/// `roles` and `user` are always sent. `nick` and `premium_since` are
/// three-state: absent leaves the field alone, `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildMemberUpdate {
    pub guild_id: Snowflake,

    #[serde(default)]
    pub roles: Vec<Snowflake>,

    pub user: User,

    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub nick: Option<Option<String>>,

    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub premium_since: Option<Option<DateTime<Utc>>>,
}

impl GuildMemberUpdate {
    /// Merge the fields this update carries into `member`.
    pub fn update(&self, member: &mut Member) {
        member.role_ids = self.roles.clone();
        member.user = self.user.clone();
        if let Some(nick) = &self.nick {
            member.nick = nick.clone();
        }
        if let Some(premium_since) = self.premium_since {
            member.premium_since = premium_since;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildMemberRemove {
    pub guild_id: Snowflake,
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildMembersChunk {
    pub guild_id: Snowflake,

    #[serde(default)]
    pub members: Vec<Member>,

    #[serde(default)]
    pub presences: Vec<Presence>,

    #[serde(default)]
    pub chunk_index: u32,

    #[serde(default)]
    pub chunk_count: u32,
}

/// Payload of both role create and role update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildRole {
    pub guild_id: Snowflake,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildRoleDelete {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildEmojisUpdate {
    pub guild_id: Snowflake,
    pub emojis: Vec<Emoji>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelPinsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,

    pub channel_id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pin_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDelete {
    pub id: Snowflake,
    pub channel_id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDeleteBulk {
    pub ids: Vec<Snowflake>,
    pub channel_id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReactionAdd {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,

    pub emoji: Emoji,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReactionRemove {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,

    pub emoji: Emoji,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReactionRemoveAll {
    pub channel_id: Snowflake,
    pub message_id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReactionRemoveEmoji {
    pub channel_id: Snowflake,
    pub message_id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,

    pub emoji: Emoji,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypingStart {
    pub channel_id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,

    pub user_id: Snowflake,

    /// Unix time in seconds
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserNoteUpdate {
    /// Target user of the note
    pub id: Snowflake,

    #[serde(default)]
    pub note: String,
}

/// Three-state optional fields: missing, explicit null, or a value.
mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
