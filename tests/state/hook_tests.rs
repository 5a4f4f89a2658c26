//! Hook Pipeline Tests

use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use chat_state::domain::{GuildStore, Member, MessageStore, Snowflake};
use chat_state::gateway::{Event, GuildCreate, GuildDelete, GuildRoleDelete};
use chat_state::state::{GuildLifecycle, GuildLifecycleEvent, State};

use crate::common::{guild_create, message, ready, CollectingSink, FaultyStore, CHANNEL, GUILD};

type Log = Arc<Mutex<Vec<String>>>;

fn state_with_log() -> (Arc<FaultyStore>, State<FaultyStore>, Log) {
    let store = Arc::new(FaultyStore::new());
    let mut state = State::new(Arc::clone(&store));
    let log: Log = Arc::default();

    // the pre handler sees the store before the event lands
    let (l, s) = (Arc::clone(&log), Arc::clone(&store));
    state.hooks_mut().add_pre_handler(move |event| {
        let known = s.calls_to("guild_set");
        l.lock().push(format!("pre {} guild_sets={known}", event.event_name()));
    });

    let l = Arc::clone(&log);
    state
        .hooks_mut()
        .add_handler(move |event| l.lock().push(format!("post {}", event.event_name())));

    let l = Arc::clone(&log);
    state
        .hooks_mut()
        .add_ready_handler(move |ready| l.lock().push(format!("ready {}", ready.session_id)));

    let l = Arc::clone(&log);
    state.hooks_mut().add_guild_handler(move |change: &GuildLifecycleEvent| {
        l.lock().push(format!("guild {} {:?}", change.guild_id, change.kind));
    });

    (store, state, log)
}

#[tokio::test]
async fn test_phase_order_for_plain_event() {
    let (_, mut state, log) = state_with_log();

    state.handle(&Event::GuildCreate(Box::new(guild_create(GUILD, &[])))).await;

    assert_eq!(
        *log.lock(),
        vec![
            "pre GUILD_CREATE guild_sets=0".to_string(),
            "post GUILD_CREATE".to_string(),
            format!("guild {GUILD} Joined"),
        ]
    );
}

#[tokio::test]
async fn test_ready_runs_ready_hook_after_post() {
    let (_, mut state, log) = state_with_log();

    let event = Event::Ready(Box::new(ready(vec![
        guild_create(GUILD, &[]),
        GuildCreate::unavailable(GUILD + 10),
    ])));
    state.handle(&event).await;

    assert_eq!(
        *log.lock(),
        vec![
            "pre READY guild_sets=0".to_string(),
            "post READY".to_string(),
            "ready session".to_string(),
            format!("guild {GUILD} Ready"),
        ]
    );
}

#[tokio::test]
async fn test_guild_lifecycle_across_events() {
    let (_, mut state, log) = state_with_log();
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let k = Arc::clone(&kinds);
    state
        .hooks_mut()
        .add_guild_handler(move |change| k.lock().push(change.kind));

    state
        .handle(&Event::Ready(Box::new(ready(vec![GuildCreate::unavailable(GUILD)]))))
        .await;
    state.handle(&Event::GuildCreate(Box::new(guild_create(GUILD, &[])))).await;
    state
        .handle(&Event::GuildDelete(GuildDelete { id: Snowflake::new(GUILD), unavailable: true }))
        .await;
    state.handle(&Event::GuildCreate(Box::new(guild_create(GUILD, &[])))).await;
    state
        .handle(&Event::GuildDelete(GuildDelete { id: Snowflake::new(GUILD), unavailable: false }))
        .await;

    assert_eq!(
        *kinds.lock(),
        vec![
            GuildLifecycle::Ready,
            GuildLifecycle::Unavailable,
            GuildLifecycle::Available,
            GuildLifecycle::Left,
        ]
    );
    assert!(log.lock().iter().any(|l| l == "post GUILD_DELETE"));
}

#[tokio::test]
async fn test_post_handler_sees_member_author() {
    let store = Arc::new(FaultyStore::new());
    let mut state = State::new(Arc::clone(&store));
    let seen = Arc::new(Mutex::new(None));

    let s = Arc::clone(&seen);
    state.hooks_mut().add_handler(move |event| {
        if let Event::MessageCreate(m) = event {
            *s.lock() = m.member.as_ref().map(|mb| mb.user.id);
        }
    });

    let mut msg = message(1);
    msg.member = Some(Member::default());
    state.handle(&Event::MessageCreate(msg.clone())).await;

    assert_eq!(*seen.lock(), Some(msg.author.id));

    // the stored copy is the payload as delivered
    let stored = store
        .message(Snowflake::new(CHANNEL), Snowflake::new(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.member.map(|mb| mb.user.id), Some(Snowflake::NULL));
}

#[tokio::test]
async fn test_post_handler_sees_member_author_on_update() {
    let store = Arc::new(FaultyStore::new());
    let mut state = State::new(Arc::clone(&store));
    let seen = Arc::new(Mutex::new(None));

    let s = Arc::clone(&seen);
    state.hooks_mut().add_handler(move |event| {
        if let Event::MessageUpdate(m) = event {
            *s.lock() = m.member.as_ref().map(|mb| mb.user.id);
        }
    });

    let mut msg = message(1);
    state.handle(&Event::MessageCreate(msg.clone())).await;
    msg.content = "edited".into();
    msg.member = Some(Member::default());
    state.handle(&Event::MessageUpdate(msg.clone())).await;

    assert_eq!(*seen.lock(), Some(msg.author.id));

    let stored = store
        .message(Snowflake::new(CHANNEL), Snowflake::new(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.content, "edited");
    assert_eq!(stored.member.map(|mb| mb.user.id), Some(Snowflake::NULL));
}

#[tokio::test]
async fn test_diagnostics_forwarded_and_counted() {
    let store = Arc::new(FaultyStore::new());
    let sink = CollectingSink::new();
    let mut state = State::new(Arc::clone(&store)).with_sink(sink.clone());

    let event = Event::GuildRoleDelete(GuildRoleDelete {
        guild_id: Snowflake::new(GUILD),
        role_id: Snowflake::new(5),
    });

    assert_eq!(state.handle(&event).await, 1);
    assert_eq!(sink.contexts(), vec!["failed to remove a role in state"]);
}

#[tokio::test]
async fn test_failures_never_stop_the_pipeline() {
    let store = Arc::new(FaultyStore::new());
    store.fail("guild_set");
    let sink = CollectingSink::new();
    let mut state = State::new(Arc::clone(&store)).with_sink(sink.clone());

    let posted = Arc::new(Mutex::new(0));
    let p = Arc::clone(&posted);
    state.hooks_mut().add_handler(move |_| *p.lock() += 1);

    state.handle(&Event::GuildCreate(Box::new(guild_create(GUILD, &[2])))).await;

    assert_eq!(*posted.lock(), 1);
    assert!(sink.len() >= 1);
    assert!(store.guild(Snowflake::new(GUILD)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_metrics_recorded_when_enabled() {
    let store = Arc::new(FaultyStore::new());
    let mut state = State::new(Arc::clone(&store)).with_metrics(true);

    state.handle(&Event::Ready(Box::new(ready(vec![])))).await;

    let metrics = chat_state::infrastructure::metrics::gather_metrics();
    assert!(metrics.contains("chat_state_events_applied_total"));
    assert!(metrics.contains("chat_state_store_resets_total"));
}
