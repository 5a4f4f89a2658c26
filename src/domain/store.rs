//! Store contract.
//!
//! The state engine only ever talks to the cache through [`Store`]. Reset
//! support is a separate capability: a store that can wipe itself in one call
//! exposes it through [`Store::resetter`], and the engine uses it before
//! rebuilding from a ready payload.

use async_trait::async_trait;

use super::entities::{
    ChannelStore, EmojiStore, GuildStore, MemberStore, MessageStore, PresenceStore, RoleStore,
    SelfStore, VoiceStateStore,
};
use crate::shared::error::StoreError;

/// Full entity cache consumed by the state engine.
pub trait Store:
    SelfStore
    + GuildStore
    + ChannelStore
    + MemberStore
    + RoleStore
    + EmojiStore
    + PresenceStore
    + MessageStore
    + VoiceStateStore
{
    /// The store's reset capability, if it has one.
    fn resetter(&self) -> Option<&dyn StoreResetter> {
        None
    }
}

/// Optional capability: clear every cached entity.
#[async_trait]
pub trait StoreResetter: Send + Sync {
    async fn reset(&self) -> Result<(), StoreError>;
}
