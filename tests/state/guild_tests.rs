//! Guild, Member and Role Reconciliation Tests

use std::sync::Arc;

use pretty_assertions::assert_eq;

use chat_state::domain::{
    ChannelStore, Emoji, EmojiStore, GuildStore, MemberStore, PresenceStore, Role, RoleStore,
    Snowflake, VoiceStateStore,
};
use chat_state::gateway::{
    Event, GuildCreate, GuildDelete, GuildEmojisUpdate, GuildMemberUpdate, GuildMembersChunk,
    GuildRole, GuildRoleDelete,
};
use chat_state::state::Reconciler;

use crate::common::{guild_create, member, FaultyStore, GUILD, ME};

fn reconciler() -> (Arc<FaultyStore>, Reconciler<FaultyStore>) {
    let store = Arc::new(FaultyStore::new());
    (Arc::clone(&store), Reconciler::new(store))
}

#[tokio::test]
async fn test_unavailable_guild_create_touches_nothing() {
    let (store, mut reconciler) = reconciler();

    let errors = reconciler
        .apply(&Event::GuildCreate(Box::new(GuildCreate::unavailable(GUILD))))
        .await;

    assert!(errors.is_empty());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_guild_create_ingests_everything() {
    let (store, mut reconciler) = reconciler();
    let guild = Snowflake::new(GUILD);

    let errors = reconciler
        .apply(&Event::GuildCreate(Box::new(guild_create(GUILD, &[2, 3]))))
        .await;

    assert!(errors.is_empty());
    assert_eq!(store.guild(guild).await.unwrap().map(|g| g.name), Some("guild100".to_string()));
    assert_eq!(store.emojis(guild).await.unwrap().len(), 1);
    assert_eq!(store.members(guild).await.unwrap().len(), 2);
    assert_eq!(store.presences(guild).await.unwrap().len(), 1);
    assert_eq!(store.voice_states(guild).await.unwrap().len(), 1);

    // channels get their guild ID back-filled
    let channels = store.channels(guild).await.unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].guild_id, Some(guild));
}

#[tokio::test]
async fn test_guild_create_without_emojis_skips_emoji_set() {
    let (store, mut reconciler) = reconciler();
    let mut payload = guild_create(GUILD, &[]);
    payload.guild.emojis = None;

    reconciler.apply(&Event::GuildCreate(Box::new(payload))).await;

    assert_eq!(store.calls_to("emoji_set"), 0);
}

#[tokio::test]
async fn test_guild_create_with_empty_emojis_clears_set() {
    let (store, mut reconciler) = reconciler();
    reconciler.apply(&Event::GuildCreate(Box::new(guild_create(GUILD, &[])))).await;

    let mut payload = guild_create(GUILD, &[]);
    payload.guild.emojis = Some(Vec::new());
    assert!(reconciler.apply(&Event::GuildCreate(Box::new(payload))).await.is_empty());

    assert_eq!(store.calls_to("emoji_set"), 2);
    assert!(store.emojis(Snowflake::new(GUILD)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_member_failures_do_not_short_circuit() {
    let (store, mut reconciler) = reconciler();
    store.fail("member_set:3");
    store.fail("member_set:5");

    let errors = reconciler
        .apply(&Event::GuildCreate(Box::new(guild_create(GUILD, &[2, 3, 4, 5, 6]))))
        .await;

    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.context == "failed to set guild member in Ready"));

    let mut stored: Vec<i64> = store
        .members(Snowflake::new(GUILD))
        .await
        .unwrap()
        .iter()
        .map(|m| m.user.id.as_i64())
        .collect();
    stored.sort();
    assert_eq!(stored, vec![2, 4, 6]);

    // later sub-steps still ran
    assert_eq!(store.calls_to("voice_state_set"), 1);
}

#[tokio::test]
async fn test_guild_delete_removes_guild() {
    let (store, mut reconciler) = reconciler();
    reconciler
        .apply(&Event::GuildCreate(Box::new(guild_create(GUILD, &[2]))))
        .await;

    let errors = reconciler
        .apply(&Event::GuildDelete(GuildDelete { id: Snowflake::new(GUILD), unavailable: false }))
        .await;

    assert!(errors.is_empty());
    assert!(store.guild(Snowflake::new(GUILD)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_guild_delete_reports_once() {
    let (store, mut reconciler) = reconciler();
    store.fail("guild_remove");

    let errors = reconciler
        .apply(&Event::GuildDelete(GuildDelete { id: Snowflake::new(GUILD), unavailable: false }))
        .await;

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].context, "failed to delete guild in state");
}

#[tokio::test]
async fn test_unavailable_guild_delete_suppresses_failure() {
    let (store, mut reconciler) = reconciler();
    store.fail("guild_remove");

    let errors = reconciler
        .apply(&Event::GuildDelete(GuildDelete { id: Snowflake::new(GUILD), unavailable: true }))
        .await;

    assert!(errors.is_empty());
    // removal is still attempted
    assert_eq!(store.calls_to("guild_remove"), 1);
}

#[tokio::test]
async fn test_member_update_without_cached_member() {
    let (store, mut reconciler) = reconciler();
    let update = GuildMemberUpdate {
        guild_id: Snowflake::new(GUILD),
        roles: vec![Snowflake::new(9)],
        user: member(7).user,
        nick: Some(Some("seven".into())),
        premium_since: None,
    };

    let errors = reconciler.apply(&Event::GuildMemberUpdate(update)).await;
    assert!(errors.is_empty());

    let stored = store
        .member(Snowflake::new(GUILD), Snowflake::new(7))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.role_ids, vec![Snowflake::new(9)]);
    assert_eq!(stored.nick.as_deref(), Some("seven"));
    assert_eq!(stored.joined_at, None);
    assert!(!stored.deaf);
}

#[tokio::test]
async fn test_member_update_lookup_failure_is_not_reported() {
    let (store, mut reconciler) = reconciler();
    store.fail("member");

    let update = GuildMemberUpdate {
        guild_id: Snowflake::new(GUILD),
        user: member(7).user,
        ..Default::default()
    };

    assert!(reconciler.apply(&Event::GuildMemberUpdate(update)).await.is_empty());
    assert!(store
        .member(Snowflake::new(GUILD), Snowflake::new(7))
        .await
        .is_err());
}

#[tokio::test]
async fn test_member_update_keeps_unsent_fields() {
    let (store, mut reconciler) = reconciler();
    let mut cached = member(7);
    cached.nick = Some("old".into());
    cached.deaf = true;
    store.member_set(Snowflake::new(GUILD), cached).await.unwrap();

    let update = GuildMemberUpdate {
        guild_id: Snowflake::new(GUILD),
        user: member(7).user,
        ..Default::default()
    };
    reconciler.apply(&Event::GuildMemberUpdate(update)).await;

    let stored = store
        .member(Snowflake::new(GUILD), Snowflake::new(7))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.nick.as_deref(), Some("old"));
    assert!(stored.deaf);
}

#[tokio::test]
async fn test_members_chunk_reports_each_failure() {
    let (store, mut reconciler) = reconciler();
    store.fail("member_set:3");
    store.fail("presence_set");

    let chunk = GuildMembersChunk {
        guild_id: Snowflake::new(GUILD),
        members: vec![member(2), member(3)],
        presences: vec![chat_state::domain::Presence::new(ME, chat_state::domain::Status::Idle)],
        ..Default::default()
    };

    let contexts: Vec<&str> = reconciler
        .apply(&Event::GuildMembersChunk(chunk))
        .await
        .iter()
        .map(|e| e.context)
        .collect();

    assert_eq!(
        contexts,
        vec![
            "failed to add a member from chunk in state",
            "failed to add a presence from chunk in state",
        ]
    );
}

#[tokio::test]
async fn test_role_lifecycle() {
    let (store, mut reconciler) = reconciler();
    reconciler
        .apply(&Event::GuildCreate(Box::new(guild_create(GUILD, &[]))))
        .await;

    let role = Role {
        id: Snowflake::new(50),
        name: "mods".into(),
        ..Default::default()
    };
    let create = GuildRole { guild_id: Snowflake::new(GUILD), role: role.clone() };
    assert!(reconciler.apply(&Event::GuildRoleCreate(create)).await.is_empty());

    let renamed = GuildRole {
        guild_id: Snowflake::new(GUILD),
        role: Role { name: "admins".into(), ..role },
    };
    assert!(reconciler.apply(&Event::GuildRoleUpdate(renamed)).await.is_empty());
    assert_eq!(
        store
            .role(Snowflake::new(GUILD), Snowflake::new(50))
            .await
            .unwrap()
            .map(|r| r.name),
        Some("admins".to_string())
    );

    let delete = GuildRoleDelete { guild_id: Snowflake::new(GUILD), role_id: Snowflake::new(50) };
    assert!(reconciler.apply(&Event::GuildRoleDelete(delete)).await.is_empty());
    assert!(store.roles(Snowflake::new(GUILD)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_role_for_unknown_guild_is_reported() {
    let (_, mut reconciler) = reconciler();
    let create = GuildRole { guild_id: Snowflake::new(GUILD), role: Role::default() };

    let errors = reconciler.apply(&Event::GuildRoleCreate(create)).await;
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        format!("failed to add a role in state: parent guild {GUILD} not found")
    );
}

#[tokio::test]
async fn test_emojis_update_replaces_set() {
    let (store, mut reconciler) = reconciler();
    reconciler
        .apply(&Event::GuildCreate(Box::new(guild_create(GUILD, &[]))))
        .await;

    let update = GuildEmojisUpdate {
        guild_id: Snowflake::new(GUILD),
        emojis: vec![Emoji::custom(8, "wave"), Emoji::custom(9, "crab")],
    };
    assert!(reconciler.apply(&Event::GuildEmojisUpdate(update)).await.is_empty());

    let names: Vec<String> = store
        .emojis(Snowflake::new(GUILD))
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["wave".to_string(), "crab".to_string()]);
}
