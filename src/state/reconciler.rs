//! Event Reconciler
//!
//! Maps every dispatch kind onto store writes. Nothing here is fatal: each
//! failing store call becomes one [`StateError`] and the remaining writes of
//! the event still run, so a partial failure leaves a partially updated
//! cache rather than an untouched one.

use std::sync::Arc;

use super::snapshot::Snapshot;
use crate::domain::{find_reaction, Member, Message, Reaction, Snowflake, Store};
use crate::gateway::{Event, GuildCreate, Ready};
use crate::shared::error::{ErrorStack, StateError};

/// Context of the diagnostic raised when the store reset on ready fails.
pub(crate) const RESET_FAILED: &str = "failed to reset state on READY";

/// Applies gateway events to a store and keeps the session snapshot.
#[derive(Debug)]
pub struct Reconciler<S> {
    store: Arc<S>,
    snapshot: Snapshot,
}

impl<S: Store> Reconciler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            snapshot: Snapshot::default(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Apply one event. Returns the diagnostics in the order they happened;
    /// an empty vector means every store write succeeded.
    pub async fn apply(&mut self, event: &Event) -> Vec<StateError> {
        let store = self.store.as_ref();
        let mut errs = ErrorStack::new();

        match event {
            Event::Ready(ready) => {
                errs.extend(resync(store, &mut self.snapshot, ready).await.into_inner());
            }

            Event::GuildCreate(guild) => errs.extend(store_guild_create(store, guild).await),
            Event::GuildUpdate(guild) => {
                errs.check(store.guild_set(guild.clone()).await, "failed to update guild in state");
            }
            Event::GuildDelete(ev) => {
                // an outage delete may name a guild that was never cached
                if let Err(err) = store.guild_remove(ev.id).await {
                    if !ev.unavailable {
                        errs.push(err, "failed to delete guild in state");
                    }
                }
            }

            Event::GuildMemberAdd(ev) => {
                errs.check(
                    store.member_set(ev.guild_id, ev.member.clone()).await,
                    "failed to add a member in state",
                );
            }
            Event::GuildMemberUpdate(ev) => {
                let mut member = match store.member(ev.guild_id, ev.user.id).await {
                    Ok(Some(member)) => member,
                    _ => Member::default(),
                };
                ev.update(&mut member);
                errs.check(store.member_set(ev.guild_id, member).await, "failed to update a member in state");
            }
            Event::GuildMemberRemove(ev) => {
                errs.check(
                    store.member_remove(ev.guild_id, ev.user.id).await,
                    "failed to remove a member in state",
                );
            }
            Event::GuildMembersChunk(ev) => {
                for member in &ev.members {
                    errs.check(
                        store.member_set(ev.guild_id, member.clone()).await,
                        "failed to add a member from chunk in state",
                    );
                }
                for presence in &ev.presences {
                    errs.check(
                        store.presence_set(ev.guild_id, presence.clone()).await,
                        "failed to add a presence from chunk in state",
                    );
                }
            }

            Event::GuildRoleCreate(ev) => {
                errs.check(store.role_set(ev.guild_id, ev.role.clone()).await, "failed to add a role in state");
            }
            Event::GuildRoleUpdate(ev) => {
                errs.check(store.role_set(ev.guild_id, ev.role.clone()).await, "failed to update a role in state");
            }
            Event::GuildRoleDelete(ev) => {
                errs.check(store.role_remove(ev.guild_id, ev.role_id).await, "failed to remove a role in state");
            }
            Event::GuildEmojisUpdate(ev) => {
                errs.check(
                    store.emoji_set(ev.guild_id, ev.emojis.clone()).await,
                    "failed to update emojis in state",
                );
            }

            Event::ChannelCreate(channel) => {
                errs.check(store.channel_set(channel.clone()).await, "failed to create a channel in state");
            }
            Event::ChannelUpdate(channel) => {
                errs.check(store.channel_set(channel.clone()).await, "failed to update a channel in state");
            }
            Event::ChannelDelete(channel) => {
                errs.check(store.channel_remove(channel).await, "failed to remove a channel in state");
            }

            Event::MessageCreate(message) => {
                errs.check(store.message_set(message.clone()).await, "failed to add a message in state");
            }
            Event::MessageUpdate(message) => {
                errs.check(store.message_set(message.clone()).await, "failed to update a message in state");
            }
            Event::MessageDelete(ev) => {
                errs.check(
                    store.message_remove(ev.channel_id, ev.id).await,
                    "failed to delete a message in state",
                );
            }
            Event::MessageDeleteBulk(ev) => {
                for id in &ev.ids {
                    errs.check(
                        store.message_remove(ev.channel_id, *id).await,
                        "failed to delete bulk messages in state",
                    );
                }
            }

            Event::MessageReactionAdd(ev) => {
                if let Some(mut message) = cached_message(store, ev.channel_id, ev.message_id).await {
                    match find_reaction(&message.reactions, &ev.emoji) {
                        Some(i) => message.reactions[i].count += 1,
                        None => {
                            let me = is_me(store, ev.user_id).await;
                            message.reactions.push(Reaction::first(ev.emoji.clone(), me));
                        }
                    }
                    errs.check(store.message_set(message).await, "failed to save message in reaction add");
                }
            }
            Event::MessageReactionRemove(ev) => {
                if let Some(mut message) = cached_message(store, ev.channel_id, ev.message_id).await {
                    if let Some(i) = find_reaction(&message.reactions, &ev.emoji) {
                        let reaction = &mut message.reactions[i];
                        reaction.count = reaction.count.saturating_sub(1);
                        if reaction.count < 1 {
                            message.reactions.remove(i);
                        } else if reaction.me && is_me(store, ev.user_id).await {
                            reaction.me = false;
                        }
                        errs.check(store.message_set(message).await, "failed to save message in reaction remove");
                    }
                }
            }
            Event::MessageReactionRemoveAll(ev) => {
                if let Some(mut message) = cached_message(store, ev.channel_id, ev.message_id).await {
                    message.reactions.clear();
                    errs.check(store.message_set(message).await, "failed to save message in reaction remove all");
                }
            }
            Event::MessageReactionRemoveEmoji(ev) => {
                if let Some(mut message) = cached_message(store, ev.channel_id, ev.message_id).await {
                    if let Some(i) = find_reaction(&message.reactions, &ev.emoji) {
                        message.reactions.remove(i);
                        errs.check(
                            store.message_set(message).await,
                            "failed to save message in reaction remove emoji",
                        );
                    }
                }
            }

            Event::PresenceUpdate(presence) => {
                errs.check(
                    store.presence_set(presence.guild_id, presence.clone()).await,
                    "failed to update presence in state",
                );
            }
            Event::PresencesReplace(presences) => {
                for presence in presences {
                    errs.check(
                        store.presence_set(presence.guild_id, presence.clone()).await,
                        "failed to update presence in state",
                    );
                }
            }

            Event::UserGuildSettingsUpdate(settings) => {
                if !self.snapshot.update_guild_settings(settings) {
                    tracing::debug!(guild_id = %settings.guild_id, "guild settings update for unknown guild");
                }
            }
            Event::UserSettingsUpdate(settings) => self.snapshot.set_settings(settings.clone()),
            Event::UserNoteUpdate(ev) => self.snapshot.set_note(ev.id, ev.note.clone()),
            Event::UserUpdate(user) => {
                errs.check(store.myself_set(user.clone()).await, "failed to update myself from USER_UPDATE");
            }

            Event::VoiceStateUpdate(vs) => {
                if vs.is_connected() {
                    errs.check(
                        store.voice_state_set(vs.guild_id, vs.clone()).await,
                        "failed to update voice state in state",
                    );
                } else {
                    errs.check(
                        store.voice_state_remove(vs.guild_id, vs.user_id).await,
                        "failed to remove voice state from state",
                    );
                }
            }

            Event::Resumed(_)
            | Event::ChannelPinsUpdate(_)
            | Event::SessionsReplace(_)
            | Event::TypingStart(_)
            | Event::Unknown(_) => {}
        }

        errs.into_inner()
    }
}

/// Ingest one guild with everything delivered alongside it.
///
/// An unavailable guild carries nothing usable and is skipped.
pub async fn store_guild_create<S: Store>(store: &S, guild: &GuildCreate) -> Vec<StateError> {
    let mut errs = ErrorStack::new();
    if guild.unavailable {
        return errs.into_inner();
    }

    let id = guild.id();
    errs.check(store.guild_set(guild.guild.clone()).await, "failed to set guild in Ready");

    if let Some(emojis) = &guild.guild.emojis {
        errs.check(
            store.emoji_set(id, emojis.clone()).await,
            "failed to set guild emojis",
        );
    }

    for member in &guild.members {
        errs.check(store.member_set(id, member.clone()).await, "failed to set guild member in Ready");
    }

    for channel in &guild.channels {
        let mut channel = channel.clone();
        channel.guild_id = Some(id);
        errs.check(store.channel_set(channel).await, "failed to set guild channel in Ready");
    }

    for presence in &guild.presences {
        errs.check(
            store.presence_set(id, presence.clone()).await,
            "failed to set guild presence in Ready",
        );
    }

    for vs in &guild.voice_states {
        errs.check(
            store.voice_state_set(id, vs.clone()).await,
            "failed to set guild voice state in Ready",
        );
    }

    errs.into_inner()
}

/// Rebuild the cache from a ready payload.
async fn resync<S: Store>(store: &S, snapshot: &mut Snapshot, ready: &Ready) -> ErrorStack {
    let mut errs = ErrorStack::new();

    if let Some(resetter) = store.resetter() {
        errs.check(resetter.reset().await, RESET_FAILED);
    }

    *snapshot = Snapshot::from_ready(ready);

    for presence in &ready.presences {
        errs.check(
            store.presence_set(Snowflake::NULL, presence.clone()).await,
            "failed to set global presence",
        );
    }

    for guild in &ready.guilds {
        errs.extend(store_guild_create(store, guild).await);
    }

    for channel in &ready.private_channels {
        errs.check(store.channel_set(channel.clone()).await, "failed to set channel in state");
    }

    errs.check(store.myself_set(ready.user.clone()).await, "failed to set self in state");

    errs
}

/// The cached message, if the store has it. Lookup failures count as a miss.
async fn cached_message<S: Store>(store: &S, channel_id: Snowflake, message_id: Snowflake) -> Option<Message> {
    match store.message(channel_id, message_id).await {
        Ok(Some(message)) => Some(message),
        Ok(None) => {
            tracing::trace!(%channel_id, %message_id, "reaction on uncached message");
            None
        }
        Err(err) => {
            tracing::debug!(%channel_id, %message_id, error = %err, "message lookup failed");
            None
        }
    }
}

async fn is_me<S: Store>(store: &S, user_id: Snowflake) -> bool {
    matches!(store.me().await, Ok(Some(me)) if me.id == user_id)
}
