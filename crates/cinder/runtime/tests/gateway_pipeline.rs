//! Gateway ingestion: handlers, cache mutation and fan-out

mod support;

use async_trait::async_trait;
use cinder_cache::CacheFlags;
use cinder_runtime::{
    listener_fn, ClientBuilder, Event, EventListener, InteractionRestClient,
    VoiceDispatchInterceptor,
};
use cinder_types::{
    InteractionResponse, Permissions, Snowflake, VoiceServerUpdate, VoiceState,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

use support::{bytes, client, client_with, drain, names, next_event, recorder};

fn id(raw: u64) -> Snowflake {
    Snowflake::new(raw)
}

fn ready_payload(guilds: &[u64]) -> Vec<u8> {
    let guilds: Vec<_> = guilds
        .iter()
        .map(|g| json!({ "id": g.to_string(), "unavailable": true }))
        .collect();
    bytes(json!({
        "v": 10,
        "user": { "id": "99", "username": "cinder", "bot": true },
        "guilds": guilds,
        "session_id": "abc",
    }))
}

fn guild_create_payload(guild_id: u64) -> Vec<u8> {
    let gid = guild_id.to_string();
    bytes(json!({
        "id": gid,
        "name": "test guild",
        "owner_id": "1",
        "member_count": 2,
        "roles": [
            { "id": gid, "name": "@everyone", "permissions": "3072", "position": 0 },
            { "id": "500", "name": "mod", "permissions": "8192", "position": 1 }
        ],
        "channels": [
            { "id": "10", "type": 0, "name": "general" },
            { "id": "11", "type": 2, "name": "voice" }
        ],
        "members": [
            { "user": { "id": "99", "username": "cinder" }, "roles": ["500"] }
        ],
        "voice_states": [
            { "channel_id": "11", "user_id": "99", "session_id": "s" }
        ],
        "emojis": [
            { "id": "700", "name": "blob" }
        ]
    }))
}

fn message_payload(message_id: u64, channel_id: u64) -> Vec<u8> {
    bytes(json!({
        "id": message_id.to_string(),
        "channel_id": channel_id.to_string(),
        "guild_id": "1",
        "author": { "id": "5", "username": "someone" },
        "content": "hello",
        "timestamp": "2024-01-01T00:00:00Z"
    }))
}

// ---------------------------------------------------------------------------
// Guild lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ready_then_guild_create_marks_guilds_ready() {
    let client = client(CacheFlags::ALL);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.events().handle_gateway("READY", 1, &ready_payload(&[1]));
    assert_eq!(client.caches().self_user().map(|u| u.id()), Some(id(99)));
    assert!(client.caches().guilds().is_unready(id(1)));

    client.events().handle_gateway("GUILD_CREATE", 2, &guild_create_payload(1));

    let events = drain(&mut rx).await;
    assert_eq!(names(&events), vec!["GuildReady", "GuildsReady", "Ready"]);

    let caches = client.caches();
    assert!(!caches.guilds().is_unready(id(1)));
    assert_eq!(caches.guilds().get(id(1)).map(|g| g.name), Some("test guild".into()));
    assert_eq!(caches.channels().guild_channels(id(1)).len(), 2);
    assert_eq!(caches.roles().group_len(id(1)), 2);
    assert!(caches.self_member(id(1)).is_some());
    assert!(caches.emojis().contains(id(1), id(700)));

    // nested entities get the envelope's guild id
    let role = caches.roles().get(id(1), id(500)).unwrap();
    assert_eq!(role.guild_id, id(1));

    let voice = caches.channels().get(id(11)).unwrap();
    assert_eq!(caches.audio_channel_members(&voice).len(), 1);

    let member = caches.self_member(id(1)).unwrap();
    let general = caches.channels().get(id(10)).unwrap();
    let perms = caches.member_permissions_in_channel(&general, &member);
    assert!(perms.contains(Permissions::SEND_MESSAGES | Permissions::MANAGE_MESSAGES));
}

#[tokio::test]
async fn ready_without_guilds_is_immediately_all_ready() {
    let client = client(CacheFlags::DEFAULT);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.events().handle_gateway("READY", 1, &ready_payload(&[]));

    assert_eq!(names(&drain(&mut rx).await), vec!["GuildsReady", "Ready"]);
}

#[tokio::test]
async fn unannounced_guild_create_is_a_join() {
    let client = client(CacheFlags::DEFAULT);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.events().handle_gateway("GUILD_CREATE", 1, &guild_create_payload(3));

    match next_event(&mut rx).await {
        Event::GuildJoin(e) => assert_eq!(e.guild.id, id(3)),
        other => panic!("expected GuildJoin, got {}", other.name()),
    }
}

#[tokio::test]
async fn outage_then_recreate_is_available() {
    let client = client(CacheFlags::DEFAULT);
    client.events().handle_gateway("GUILD_CREATE", 1, &guild_create_payload(4));

    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client
        .events()
        .handle_gateway("GUILD_DELETE", 2, &bytes(json!({ "id": "4", "unavailable": true })));
    assert!(client.caches().guilds().is_unavailable(id(4)));
    assert!(matches!(next_event(&mut rx).await, Event::GuildUnavailable(_)));

    client.events().handle_gateway("GUILD_CREATE", 3, &guild_create_payload(4));
    assert!(matches!(next_event(&mut rx).await, Event::GuildAvailable(_)));
    assert!(!client.caches().guilds().is_unavailable(id(4)));
}

#[tokio::test]
async fn recreate_after_outage_replaces_stale_entries() {
    let client = client(CacheFlags::ALL);
    client.events().handle_gateway("GUILD_CREATE", 1, &guild_create_payload(4));
    assert!(client.caches().roles().contains(id(4), id(500)));
    assert!(client.caches().channels().get(id(11)).is_some());

    client
        .events()
        .handle_gateway("GUILD_DELETE", 2, &bytes(json!({ "id": "4", "unavailable": true })));

    // the role and the voice channel were deleted during the outage
    client.events().handle_gateway(
        "GUILD_CREATE",
        3,
        &bytes(json!({
            "id": "4",
            "name": "test guild",
            "owner_id": "1",
            "roles": [ { "id": "4", "name": "@everyone", "permissions": "3072" } ],
            "channels": [ { "id": "10", "type": 0, "name": "general" } ]
        })),
    );

    let caches = client.caches();
    assert!(caches.roles().contains(id(4), id(4)));
    assert!(!caches.roles().contains(id(4), id(500)));
    assert!(caches.channels().get(id(10)).is_some());
    assert!(caches.channels().get(id(11)).is_none());
    assert_eq!(caches.emojis().group_len(id(4)), 0);
    assert_eq!(caches.voice_states().group_len(id(4)), 0);
    assert!(!caches.guilds().is_unavailable(id(4)));
}

#[tokio::test]
async fn leaving_a_guild_drops_its_data() {
    let client = client(CacheFlags::ALL);
    client.events().handle_gateway("GUILD_CREATE", 1, &guild_create_payload(1));
    client.events().handle_gateway("MESSAGE_CREATE", 2, &message_payload(800, 10));
    assert_eq!(client.caches().messages().group_len(id(10)), 1);

    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);
    client
        .events()
        .handle_gateway("GUILD_DELETE", 3, &bytes(json!({ "id": "1" })));

    match next_event(&mut rx).await {
        Event::GuildLeave(e) => {
            assert_eq!(e.guild_id, id(1));
            assert_eq!(e.guild.map(|g| g.name), Some("test guild".into()));
        }
        other => panic!("expected GuildLeave, got {}", other.name()),
    }

    let caches = client.caches();
    assert!(caches.guilds().get(id(1)).is_none());
    assert!(caches.channels().guild_channels(id(1)).is_empty());
    assert_eq!(caches.roles().group_len(id(1)), 0);
    assert_eq!(caches.messages().group_len(id(10)), 0);
}

// ---------------------------------------------------------------------------
// Entity updates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn role_update_carries_previous_value() {
    let client = client(CacheFlags::DEFAULT);
    client.events().handle_gateway("GUILD_CREATE", 1, &guild_create_payload(1));

    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);
    client.events().handle_gateway(
        "GUILD_ROLE_UPDATE",
        2,
        &bytes(json!({
            "guild_id": "1",
            "role": { "id": "500", "name": "moderator", "permissions": "8192", "position": 1 }
        })),
    );

    match next_event(&mut rx).await {
        Event::RoleUpdate(e) => {
            assert_eq!(e.role.name, "moderator");
            assert_eq!(e.old_role.map(|r| r.name), Some("mod".into()));
        }
        other => panic!("expected RoleUpdate, got {}", other.name()),
    }
    assert_eq!(
        client.caches().roles().get(id(1), id(500)).map(|r| r.name),
        Some("moderator".into())
    );
}

#[tokio::test]
async fn emoji_update_is_diffed_per_emoji() {
    let client = client(CacheFlags::DEFAULT);
    client.events().handle_gateway("GUILD_CREATE", 1, &guild_create_payload(1));

    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);
    client.events().handle_gateway(
        "GUILD_EMOJIS_UPDATE",
        2,
        &bytes(json!({
            "guild_id": "1",
            "emojis": [ { "id": "701", "name": "new" } ]
        })),
    );

    assert_eq!(names(&drain(&mut rx).await), vec!["EmojiCreate", "EmojiDelete"]);
    let emojis = client.caches().emojis();
    assert!(emojis.contains(id(1), id(701)));
    assert!(!emojis.contains(id(1), id(700)));
}

#[tokio::test]
async fn channel_delete_splits_guild_and_dm() {
    let client = client(CacheFlags::ALL);
    client.events().handle_gateway("GUILD_CREATE", 1, &guild_create_payload(1));
    client.events().handle_gateway("MESSAGE_CREATE", 2, &message_payload(800, 10));

    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.events().handle_gateway(
        "CHANNEL_DELETE",
        3,
        &bytes(json!({ "id": "10", "type": 0, "guild_id": "1" })),
    );
    assert!(matches!(next_event(&mut rx).await, Event::GuildChannelDelete(_)));
    assert!(client.caches().channels().get(id(10)).is_none());
    assert_eq!(client.caches().messages().group_len(id(10)), 0);

    client
        .events()
        .handle_gateway("CHANNEL_DELETE", 4, &bytes(json!({ "id": "20", "type": 1 })));
    assert!(matches!(next_event(&mut rx).await, Event::DmChannelDelete(_)));
}

#[tokio::test]
async fn message_reactions_fold_into_cached_message() {
    let client = client(CacheFlags::ALL);
    client.events().handle_gateway("MESSAGE_CREATE", 1, &message_payload(800, 10));

    let reaction = json!({
        "user_id": "5",
        "channel_id": "10",
        "message_id": "800",
        "emoji": { "name": "👍" }
    });
    client.events().handle_gateway("MESSAGE_REACTION_ADD", 2, &bytes(reaction.clone()));
    client.events().handle_gateway("MESSAGE_REACTION_ADD", 3, &bytes(reaction));

    let message = client.caches().messages().get(id(10), id(800)).unwrap();
    assert_eq!(message.reactions.len(), 1);
    assert_eq!(message.reactions[0].count, 2);

    client.events().handle_gateway(
        "MESSAGE_REACTION_REMOVE_ALL",
        4,
        &bytes(json!({ "channel_id": "10", "message_id": "800" })),
    );
    let message = client.caches().messages().get(id(10), id(800)).unwrap();
    assert!(message.reactions.is_empty());
}

#[tokio::test]
async fn reactions_split_into_guild_and_dm_events() {
    let client = client(CacheFlags::ALL);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    let reaction = |guild: Option<&str>| {
        let mut payload = json!({
            "user_id": "5",
            "channel_id": "10",
            "message_id": "800",
            "emoji": { "name": "👍" }
        });
        if let Some(guild) = guild {
            payload["guild_id"] = json!(guild);
        }
        bytes(payload)
    };

    client.events().handle_gateway("MESSAGE_REACTION_ADD", 1, &reaction(Some("1")));
    match next_event(&mut rx).await {
        Event::GuildMessageReactionAdd(e) => {
            assert_eq!(e.guild_id, id(1));
            assert_eq!(e.message_id, id(800));
        }
        other => panic!("expected GuildMessageReactionAdd, got {}", other.name()),
    }

    client.events().handle_gateway("MESSAGE_REACTION_ADD", 2, &reaction(None));
    match next_event(&mut rx).await {
        Event::DmMessageReactionAdd(e) => assert_eq!(e.user_id, id(5)),
        other => panic!("expected DmMessageReactionAdd, got {}", other.name()),
    }

    client.events().handle_gateway("MESSAGE_REACTION_REMOVE", 3, &reaction(Some("1")));
    assert!(matches!(
        next_event(&mut rx).await,
        Event::GuildMessageReactionRemove(_)
    ));
    client.events().handle_gateway("MESSAGE_REACTION_REMOVE", 4, &reaction(None));
    assert!(matches!(next_event(&mut rx).await, Event::DmMessageReactionRemove(_)));

    let emoji_payload = |guild: Option<&str>| {
        let mut payload = json!({ "channel_id": "10", "message_id": "800", "emoji": { "name": "👍" } });
        if let Some(guild) = guild {
            payload["guild_id"] = json!(guild);
        }
        bytes(payload)
    };
    client
        .events()
        .handle_gateway("MESSAGE_REACTION_REMOVE_EMOJI", 5, &emoji_payload(Some("1")));
    assert!(matches!(
        next_event(&mut rx).await,
        Event::GuildMessageReactionRemoveEmoji(_)
    ));
    client
        .events()
        .handle_gateway("MESSAGE_REACTION_REMOVE_EMOJI", 6, &emoji_payload(None));
    assert!(matches!(
        next_event(&mut rx).await,
        Event::DmMessageReactionRemoveEmoji(_)
    ));

    client.events().handle_gateway(
        "MESSAGE_REACTION_REMOVE_ALL",
        7,
        &bytes(json!({ "channel_id": "10", "message_id": "800", "guild_id": "1" })),
    );
    assert!(matches!(
        next_event(&mut rx).await,
        Event::GuildMessageReactionRemoveAll(_)
    ));
    client.events().handle_gateway(
        "MESSAGE_REACTION_REMOVE_ALL",
        8,
        &bytes(json!({ "channel_id": "10", "message_id": "800" })),
    );
    assert!(matches!(
        next_event(&mut rx).await,
        Event::DmMessageReactionRemoveAll(_)
    ));
}

// ---------------------------------------------------------------------------
// Unknown tags and decode failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_tag_dispatches_nothing_and_mutates_nothing() {
    let client = client(CacheFlags::ALL);
    client.events().handle_gateway("GUILD_CREATE", 1, &guild_create_payload(1));

    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);
    let guilds_before = client.caches().guilds().len();
    let channels_before = client.caches().channels().len();

    client
        .events()
        .handle_gateway("SOMETHING_NEW", 2, &guild_create_payload(2));

    assert!(drain(&mut rx).await.is_empty());
    assert_eq!(client.caches().guilds().len(), guilds_before);
    assert_eq!(client.caches().channels().len(), channels_before);
}

#[tokio::test]
async fn raw_events_cover_unknown_tags_when_enabled() {
    let client = client_with(CacheFlags::DEFAULT, true);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.events().handle_gateway("SOMETHING_NEW", 9, b"{}");

    match next_event(&mut rx).await {
        Event::RawEvent(e) => {
            assert_eq!(e.event_type.as_str(), "SOMETHING_NEW");
            assert_eq!(e.generic.sequence().number(), Some(9));
            assert_eq!(&*e.payload, b"{}");
        }
        other => panic!("expected RawEvent, got {}", other.name()),
    }
    assert!(drain(&mut rx).await.is_empty());
}

#[tokio::test]
async fn undecodable_payload_is_processed_as_zero_placeholder() {
    let client = client(CacheFlags::ALL);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.events().handle_gateway(
        "MESSAGE_CREATE",
        1,
        &bytes(json!({ "id": "800", "channel_id": "10", "content": 7 })),
    );

    match next_event(&mut rx).await {
        Event::MessageCreate(e) => {
            assert_eq!(e.generic.sequence().number(), Some(1));
            assert_eq!(e.message.id, Snowflake::ZERO);
            assert!(e.message.content.is_empty());
        }
        other => panic!("expected MessageCreate, got {}", other.name()),
    }
    assert!(client.caches().messages().get(id(10), id(800)).is_none());
    assert!(client
        .caches()
        .messages()
        .get(Snowflake::ZERO, Snowflake::ZERO)
        .is_some());

    // the pipeline keeps going afterwards
    client.events().handle_gateway("MESSAGE_CREATE", 2, &message_payload(801, 10));
    assert!(matches!(next_event(&mut rx).await, Event::MessageCreate(_)));
    assert!(client.caches().messages().contains(id(10), id(801)));
}

#[tokio::test]
async fn resumed_uses_placeholder_on_garbage() {
    let client = client(CacheFlags::DEFAULT);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.events().handle_gateway("RESUMED", 5, b"not json");

    match next_event(&mut rx).await {
        Event::Resumed(e) => assert_eq!(e.generic.sequence().number(), Some(5)),
        other => panic!("expected Resumed, got {}", other.name()),
    }
}

// ---------------------------------------------------------------------------
// Fan-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn faulty_listeners_do_not_starve_siblings() {
    let client = client(CacheFlags::ALL);
    let (first, mut rx_first) = recorder();
    let (second, mut rx_second) = recorder();

    client.events().add_listeners([
        listener_fn(|_| panic!("listener blew up")),
        first,
        listener_fn(|_| Err(anyhow::anyhow!("listener refused"))),
        second,
    ]);

    client.events().handle_gateway("MESSAGE_CREATE", 1, &message_payload(800, 10));

    for rx in [&mut rx_first, &mut rx_second] {
        match next_event(rx).await {
            Event::MessageCreate(e) => assert_eq!(e.message.id, id(800)),
            other => panic!("expected MessageCreate, got {}", other.name()),
        }
    }

    // ingestion keeps going after the faults
    client.events().handle_gateway("MESSAGE_CREATE", 2, &message_payload(801, 10));
    assert!(matches!(next_event(&mut rx_first).await, Event::MessageCreate(_)));
    assert_eq!(client.caches().messages().group_len(id(10)), 2);
}

/// Never finishes handling an event.
struct Stalled;

#[async_trait]
impl EventListener for Stalled {
    async fn on_event(&self, _event: &Event) -> anyhow::Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

#[tokio::test]
async fn stalled_listener_does_not_block_ingestion() {
    let client = client(CacheFlags::ALL);
    let (recorded, mut rx) = recorder();
    client.events().add_listeners([Arc::new(Stalled) as Arc<dyn EventListener>, recorded]);

    for (seq, message_id) in (800..805).enumerate() {
        client
            .events()
            .handle_gateway("MESSAGE_CREATE", seq as u64 + 1, &message_payload(message_id, 10));
        assert!(client.caches().messages().contains(id(10), id(message_id)));
    }

    for message_id in 800..805 {
        match next_event(&mut rx).await {
            Event::MessageCreate(e) => assert_eq!(e.message.id, id(message_id)),
            other => panic!("expected MessageCreate, got {}", other.name()),
        }
    }
    assert_eq!(client.caches().messages().group_len(id(10)), 5);
}

#[tokio::test]
async fn removed_listener_receives_nothing() {
    let client = client(CacheFlags::ALL);
    let (kept, mut rx_kept) = recorder();
    let (removed, mut rx_removed) = recorder();
    client.events().add_listeners([kept, Arc::clone(&removed)]);

    client.events().remove_listeners(&[removed]);
    assert_eq!(client.events().listener_count(), 1);

    client.events().handle_gateway("MESSAGE_CREATE", 1, &message_payload(800, 10));
    assert!(matches!(next_event(&mut rx_kept).await, Event::MessageCreate(_)));
    assert!(drain(&mut rx_removed).await.is_empty());
}

#[tokio::test]
async fn events_carry_bot_and_sequence() {
    let client = client(CacheFlags::ALL);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.events().handle_gateway("READY", 1, &ready_payload(&[]));
    client.events().handle_gateway("MESSAGE_CREATE", 42, &message_payload(800, 10));

    let events = drain(&mut rx).await;
    let message = events
        .iter()
        .find(|e| matches!(e, Event::MessageCreate(_)))
        .unwrap();
    assert_eq!(message.sequence().number(), Some(42));
    assert_eq!(message.bot().self_user().map(|u| u.id()), Some(id(99)));
}

#[tokio::test]
async fn message_collector_filters_by_channel() {
    let client = client(CacheFlags::DEFAULT);
    let mut collector = client
        .events()
        .collect_messages(id(10), |m| m.content.starts_with("hel"));
    assert_eq!(client.events().listener_count(), 1);

    client.events().handle_gateway("MESSAGE_CREATE", 1, &message_payload(800, 11));
    client.events().handle_gateway("MESSAGE_CREATE", 2, &message_payload(801, 10));

    let collected = tokio::time::timeout(support::WAIT, collector.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(collected.id, id(801));

    collector.close();
    assert!(collector.is_closed());
    assert_eq!(client.events().listener_count(), 0);
}

#[tokio::test]
async fn close_clears_listeners() {
    let client = client(CacheFlags::DEFAULT);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.close();
    assert_eq!(client.events().listener_count(), 0);

    client.events().handle_gateway("READY", 1, &ready_payload(&[]));
    assert!(drain(&mut rx).await.is_empty());
}

// ---------------------------------------------------------------------------
// Voice interceptor
// ---------------------------------------------------------------------------

#[derive(Default)]
struct VoiceLog {
    states: Mutex<Vec<Snowflake>>,
    servers: Mutex<Vec<Snowflake>>,
}

impl VoiceDispatchInterceptor for VoiceLog {
    fn on_voice_state_update(&self, state: &VoiceState) {
        self.states.lock().push(state.user_id);
    }

    fn on_voice_server_update(&self, update: &VoiceServerUpdate) {
        self.servers.lock().push(update.guild_id);
    }
}

#[tokio::test]
async fn voice_interceptor_sees_only_local_states() {
    let log = Arc::new(VoiceLog::default());
    let client = ClientBuilder::new()
        .with_voice_interceptor(log.clone())
        .build()
        .unwrap();
    client.events().handle_gateway("READY", 1, &ready_payload(&[]));

    let state = |user: &str| {
        bytes(json!({ "guild_id": "1", "channel_id": "11", "user_id": user, "session_id": "s" }))
    };
    client.events().handle_gateway("VOICE_STATE_UPDATE", 2, &state("5"));
    client.events().handle_gateway("VOICE_STATE_UPDATE", 3, &state("99"));
    client.events().handle_gateway(
        "VOICE_SERVER_UPDATE",
        4,
        &bytes(json!({ "token": "t", "guild_id": "1", "endpoint": "voice.example" })),
    );

    assert_eq!(*log.states.lock(), vec![id(99)]);
    assert_eq!(*log.servers.lock(), vec![id(1)]);
    assert_eq!(client.caches().voice_states().group_len(id(1)), 2);

    // leaving voice removes the state
    client.events().handle_gateway(
        "VOICE_STATE_UPDATE",
        5,
        &bytes(json!({ "guild_id": "1", "channel_id": null, "user_id": "5" })),
    );
    assert!(!client.caches().voice_states().contains(id(1), id(5)));
}

#[tokio::test]
async fn voice_state_member_is_cached_with_its_guild() {
    let client = client(CacheFlags::ALL);
    client.events().handle_gateway("GUILD_CREATE", 1, &guild_create_payload(1));

    client.events().handle_gateway(
        "VOICE_STATE_UPDATE",
        2,
        &bytes(json!({
            "guild_id": "1",
            "channel_id": "11",
            "user_id": "6",
            "session_id": "s",
            "member": { "user": { "id": "6", "username": "listener" }, "roles": ["500"] }
        })),
    );

    let caches = client.caches();
    let member = caches.members().get(id(1), id(6)).unwrap();
    assert_eq!(member.guild_id, id(1));
    let roles: Vec<_> = caches.member_roles(&member).into_iter().map(|r| r.id).collect();
    assert_eq!(roles, vec![id(500)]);

    let state = caches.voice_states().get(id(1), id(6)).unwrap();
    assert_eq!(state.member.map(|m| m.guild_id), Some(id(1)));
}

// ---------------------------------------------------------------------------
// Gateway interactions
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingRest {
    calls: Mutex<Vec<(Snowflake, String, InteractionResponse)>>,
}

#[async_trait]
impl InteractionRestClient for RecordingRest {
    async fn create_interaction_response(
        &self,
        interaction_id: Snowflake,
        token: &str,
        response: &InteractionResponse,
    ) -> anyhow::Result<()> {
        self.calls
            .lock()
            .push((interaction_id, token.to_string(), response.clone()));
        Ok(())
    }
}

#[tokio::test]
async fn gateway_interaction_answers_through_rest_client() {
    let rest = Arc::new(RecordingRest::default());
    let client = ClientBuilder::new()
        .with_rest_client(rest.clone())
        .build()
        .unwrap();

    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    client.events().add_listener(Arc::new(Responder { done: done_tx }));
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    client.events().handle_gateway(
        "INTERACTION_CREATE",
        1,
        &bytes(json!({
            "id": "900",
            "application_id": "42",
            "token": "tok",
            "type": 2,
            "data": { "id": "1", "name": "ping" }
        })),
    );

    assert_eq!(
        names(&drain(&mut rx).await),
        vec!["ApplicationCommandInteractionCreate", "InteractionCreate"]
    );
    tokio::time::timeout(support::WAIT, done_rx.recv())
        .await
        .unwrap();

    let calls = rest.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, id(900));
    assert_eq!(calls[0].1, "tok");
}

/// Answers command interactions from the variant-specific event only.
struct Responder {
    done: tokio::sync::mpsc::UnboundedSender<()>,
}

#[async_trait]
impl cinder_runtime::EventListener for Responder {
    async fn on_event(&self, event: &Event) -> anyhow::Result<()> {
        if let Event::ApplicationCommandInteractionCreate(e) = event {
            e.responder
                .respond(InteractionResponse::message(json!({ "content": "pong" })))
                .await?;
            let _ = self.done.send(());
        }
        Ok(())
    }
}
