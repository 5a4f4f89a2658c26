//! # Domain Entities
//!
//! Entities the gateway pushes to the client, as they are cached locally.
//!
//! ## Core Entities
//!
//! - **Guild**: A community that contains channels, roles and members
//! - **Channel**: A guild channel or a direct message channel
//! - **Member**: A user's membership in a specific guild
//! - **Role**: A set of permissions assignable to guild members
//! - **Message**: A message in a channel, with its reactions
//! - **Presence**, **VoiceState**: Per-guild user status
//! - **User**: A user account, including the session's own user
//!
//! ## Store Traits
//!
//! Each entity has an associated store trait defining cache access. They
//! are combined into [`crate::domain::Store`] and implemented in the
//! infrastructure layer.

mod channel;
mod emoji;
mod guild;
mod member;
mod message;
mod presence;
mod reaction;
mod role;
mod settings;
mod user;
mod voice_state;

pub use channel::{Channel, ChannelStore, ChannelType};
pub use emoji::{Emoji, EmojiStore};
pub use guild::{Guild, GuildStore};
pub use member::{Member, MemberStore};
pub use message::{Message, MessageStore, MessageType};
pub use presence::{Activity, Presence, PresenceStore, PresenceUser, Status};
pub use reaction::{find_reaction, Reaction};
pub use role::{Role, RoleStore};
pub use settings::{ChannelOverride, UserGuildSettings, UserSettings};
pub use user::{SelfStore, User};
pub use voice_state::{VoiceState, VoiceStateStore};
