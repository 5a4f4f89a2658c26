//! Ready Resync and Snapshot Tests

use std::sync::Arc;

use pretty_assertions::assert_eq;

use chat_state::domain::{
    Channel, ChannelStore, GuildStore, MemberStore, Presence, PresenceStore, SelfStore, Snowflake,
    Status, User, UserGuildSettings, UserSettings,
};
use chat_state::gateway::{Event, GuildCreate, UserNoteUpdate};
use chat_state::state::Reconciler;

use crate::common::{guild_create, me, ready, FaultyStore, GUILD, ME};

fn resync_event(guilds: Vec<GuildCreate>) -> Event {
    Event::Ready(Box::new(ready(guilds)))
}

#[tokio::test]
async fn test_reset_runs_once_before_ingestion() {
    let store = Arc::new(FaultyStore::new());
    let mut reconciler = Reconciler::new(Arc::clone(&store));

    reconciler
        .apply(&resync_event(vec![guild_create(GUILD, &[2]), guild_create(GUILD + 10, &[3])]))
        .await;

    let calls = store.calls();
    assert_eq!(calls.first().map(String::as_str), Some("reset:0"));
    assert_eq!(store.calls_to("reset"), 1);
    assert_eq!(store.calls_to("guild_set"), 2);
}

#[tokio::test]
async fn test_resync_wipes_previous_state() {
    let store = Arc::new(FaultyStore::new());
    let mut reconciler = Reconciler::new(Arc::clone(&store));
    reconciler.apply(&resync_event(vec![guild_create(GUILD, &[2])])).await;

    reconciler.apply(&resync_event(vec![guild_create(GUILD + 10, &[3])])).await;

    let ids: Vec<Snowflake> = store.guilds().await.unwrap().iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![Snowflake::new(GUILD + 10)]);
    assert!(store.members(Snowflake::new(GUILD)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resync_without_reset_capability() {
    let store = Arc::new(FaultyStore::without_reset());
    let mut reconciler = Reconciler::new(Arc::clone(&store));

    let errors = reconciler.apply(&resync_event(vec![guild_create(GUILD, &[2])])).await;

    assert!(errors.is_empty());
    assert_eq!(store.calls_to("reset"), 0);
    assert!(store.guild(Snowflake::new(GUILD)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_failed_reset_does_not_abort_resync() {
    let store = Arc::new(FaultyStore::new());
    store.fail("reset");
    let mut reconciler = Reconciler::new(Arc::clone(&store));

    let errors = reconciler.apply(&resync_event(vec![guild_create(GUILD, &[2])])).await;

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].context, "failed to reset state on READY");
    assert!(store.guild(Snowflake::new(GUILD)).await.unwrap().is_some());
    assert_eq!(store.me().await.unwrap(), Some(me()));
}

#[tokio::test]
async fn test_resync_sub_steps_are_isolated() {
    let store = Arc::new(FaultyStore::new());
    store.fail("presence_set");
    store.fail(&format!("guild_set:{GUILD}"));
    let mut reconciler = Reconciler::new(Arc::clone(&store));

    let mut payload = ready(vec![guild_create(GUILD, &[2]), guild_create(GUILD + 10, &[3])]);
    payload.presences = vec![Presence::new(9, Status::Online)];
    payload.private_channels = vec![Channel::direct(500, User::new(9, "friend"))];

    let contexts: Vec<&str> = reconciler
        .apply(&Event::Ready(Box::new(payload)))
        .await
        .iter()
        .map(|e| e.context)
        .collect();

    assert_eq!(
        contexts,
        vec![
            "failed to set global presence",
            "failed to set guild in Ready",
            // the failed guild still has its emojis written against a missing parent
            "failed to set guild emojis",
            "failed to set guild presence in Ready",
            "failed to set guild presence in Ready",
        ]
    );
    assert!(store.guild(Snowflake::new(GUILD + 10)).await.unwrap().is_some());
    assert_eq!(store.private_channels().await.unwrap().len(), 1);
    assert_eq!(store.me().await.unwrap(), Some(me()));
}

#[tokio::test]
async fn test_global_presences_are_stored_unscoped() {
    let store = Arc::new(FaultyStore::new());
    let mut reconciler = Reconciler::new(Arc::clone(&store));

    let mut payload = ready(vec![]);
    payload.presences = vec![Presence::new(9, Status::Idle)];
    reconciler.apply(&Event::Ready(Box::new(payload))).await;

    let presence = store.presence(Snowflake::NULL, Snowflake::new(9)).await.unwrap();
    assert_eq!(presence.map(|p| p.status), Some(Status::Idle));
}

#[tokio::test]
async fn test_unavailable_guilds_in_ready_are_skipped() {
    let store = Arc::new(FaultyStore::new());
    let mut reconciler = Reconciler::new(Arc::clone(&store));

    reconciler
        .apply(&resync_event(vec![GuildCreate::unavailable(GUILD)]))
        .await;

    assert!(store.guilds().await.unwrap().is_empty());
    assert_eq!(store.me().await.unwrap().map(|u| u.id), Some(Snowflake::new(ME)));
}

#[tokio::test]
async fn test_snapshot_follows_ready_and_patches() {
    let store = Arc::new(FaultyStore::new());
    let mut reconciler = Reconciler::new(Arc::clone(&store));

    let mut payload = ready(vec![]);
    payload.user_settings = Some(UserSettings { theme: "dark".into(), ..Default::default() });
    payload.user_guild_settings = vec![UserGuildSettings {
        guild_id: Snowflake::new(GUILD),
        ..Default::default()
    }];
    reconciler.apply(&Event::Ready(Box::new(payload))).await;

    assert_eq!(reconciler.snapshot().session_id(), "session");
    assert_eq!(reconciler.snapshot().settings().map(|s| s.theme.as_str()), Some("dark"));

    let calls_before = store.calls().len();

    // known guild: replaced
    let muted = UserGuildSettings { guild_id: Snowflake::new(GUILD), muted: true, ..Default::default() };
    assert!(reconciler.apply(&Event::UserGuildSettingsUpdate(muted)).await.is_empty());
    assert_eq!(
        reconciler.snapshot().guild_settings(Snowflake::new(GUILD)).map(|s| s.muted),
        Some(true)
    );

    // unknown guild: ignored
    let other = UserGuildSettings { guild_id: Snowflake::new(GUILD + 1), ..Default::default() };
    reconciler.apply(&Event::UserGuildSettingsUpdate(other)).await;
    assert!(reconciler.snapshot().guild_settings(Snowflake::new(GUILD + 1)).is_none());

    let light = UserSettings { theme: "light".into(), ..Default::default() };
    reconciler.apply(&Event::UserSettingsUpdate(light)).await;
    assert_eq!(reconciler.snapshot().settings().map(|s| s.theme.as_str()), Some("light"));

    let note = UserNoteUpdate { id: Snowflake::new(9), note: "likes crabs".into() };
    reconciler.apply(&Event::UserNoteUpdate(note)).await;
    assert_eq!(reconciler.snapshot().note(Snowflake::new(9)), Some("likes crabs"));

    // settings never touch the store
    assert_eq!(store.calls().len(), calls_before);
}

#[tokio::test]
async fn test_private_channels_restored() {
    let store = Arc::new(FaultyStore::new());
    let mut reconciler = Reconciler::new(Arc::clone(&store));

    let mut payload = ready(vec![]);
    payload.private_channels = vec![Channel::direct(500, User::new(9, "friend"))];
    reconciler.apply(&Event::Ready(Box::new(payload))).await;

    let channel = store.channel(Snowflake::new(500)).await.unwrap().unwrap();
    assert!(channel.is_dm());
    assert_eq!(channel.guild(), None);
}
