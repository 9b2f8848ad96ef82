//! Guild-scoped handlers: guild lifecycle, roles, emojis, stickers, stage
//! instances and scheduled events

use cinder_types::{
    GatewayEventType, Guild, GuildCreatePayload, GuildEmojisUpdatePayload, GuildRoleDeletePayload,
    GuildRolePayload, GuildScheduledEvent, GuildStickersUpdatePayload, Snowflake, StageInstance,
    UnavailableGuild,
};
use std::collections::HashMap;

use super::{GatewayEventHandler, HandlerContext};
use crate::events::{
    EmojiCreate, EmojiDelete, EmojiUpdate, Event, GuildAvailable, GuildJoin, GuildLeave,
    GuildReady, GuildScheduledEventCreate, GuildScheduledEventDelete, GuildScheduledEventUpdate,
    GuildUnavailable, GuildUpdate, GuildsReady, RoleCreate, RoleDelete, RoleUpdate,
    StageInstanceCreate, StageInstanceDelete, StageInstanceUpdate, StickerCreate, StickerDelete,
    StickerUpdate,
};

// ═══════════════════════════════════════════════════════════════════
// GUILD LIFECYCLE
// ═══════════════════════════════════════════════════════════════════

/// GUILD_CREATE: replaces the guild's cached state with the delivered
/// snapshot.
///
/// Classified as ready (announced by READY), available (back from an
/// outage) or join (anything else).
pub struct GuildCreateHandler;

impl GatewayEventHandler for GuildCreateHandler {
    type Payload = GuildCreatePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildCreate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: GuildCreatePayload) -> Vec<Event> {
        let caches = ctx.caches();
        let guild_id = payload.guild.id;

        let was_unready = caches.guilds().is_unready(guild_id);
        let was_unavailable = caches.guilds().is_unavailable(guild_id);
        caches.guilds().set_unready(guild_id, false);
        caches.guilds().set_unavailable(guild_id, false);

        // the payload is a full snapshot; drop whatever it no longer lists
        caches.remove_guild_data(guild_id);
        caches.guilds().put(payload.guild.clone());

        for mut channel in payload.channels.into_iter().chain(payload.threads) {
            channel.set_guild_id(guild_id);
            caches.channels().put(channel);
        }
        for mut role in payload.roles {
            role.guild_id = guild_id;
            caches.roles().put(guild_id, role.id, role);
        }
        for mut member in payload.members {
            member.guild_id = guild_id;
            caches.members().put(guild_id, member.user_id(), member);
        }
        for mut presence in payload.presences {
            presence.guild_id = guild_id;
            caches.presences().put(guild_id, presence.user_id(), presence);
        }
        for mut state in payload.voice_states {
            state.guild_id = Some(guild_id);
            caches.voice_states().put(guild_id, state.user_id, state);
        }
        for mut emoji in payload.emojis {
            emoji.guild_id = guild_id;
            caches.emojis().put(guild_id, emoji.id, emoji);
        }
        for mut sticker in payload.stickers {
            sticker.guild_id = guild_id;
            caches.stickers().put(guild_id, sticker.id, sticker);
        }
        for mut stage in payload.stage_instances {
            stage.guild_id = guild_id;
            caches.stage_instances().put(guild_id, stage.id, stage);
        }
        for mut scheduled in payload.guild_scheduled_events {
            scheduled.guild_id = guild_id;
            caches.scheduled_events().put(guild_id, scheduled.id, scheduled);
        }

        let guild = payload.guild;
        if was_unready {
            let mut events = vec![Event::from(GuildReady {
                generic: ctx.generic(),
                guild,
            })];
            if caches.guilds().unready_ids().is_empty() {
                tracing::info!("All announced guilds delivered");
                events.push(
                    GuildsReady {
                        generic: ctx.generic(),
                    }
                    .into(),
                );
            }
            events
        } else if was_unavailable {
            tracing::info!(guild_id = %guild_id, "Guild available again");
            vec![GuildAvailable {
                generic: ctx.generic(),
                guild,
            }
            .into()]
        } else {
            tracing::info!(guild_id = %guild_id, name = %guild.name, "Joined guild");
            vec![GuildJoin {
                generic: ctx.generic(),
                guild,
            }
            .into()]
        }
    }
}

pub struct GuildUpdateHandler;

impl GatewayEventHandler for GuildUpdateHandler {
    type Payload = Guild;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, guild: Guild) -> Vec<Event> {
        let old_guild = ctx.caches().guilds().get(guild.id);
        ctx.caches().guilds().put(guild.clone());
        vec![GuildUpdate {
            generic: ctx.generic(),
            guild,
            old_guild,
        }
        .into()]
    }
}

/// GUILD_DELETE: an outage when `unavailable` is set, a departure otherwise
pub struct GuildDeleteHandler;

impl GatewayEventHandler for GuildDeleteHandler {
    type Payload = UnavailableGuild;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildDelete
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: UnavailableGuild) -> Vec<Event> {
        let caches = ctx.caches();
        if payload.unavailable {
            caches.guilds().set_unavailable(payload.id, true);
            tracing::warn!(guild_id = %payload.id, "Guild became unavailable");
            return vec![GuildUnavailable {
                generic: ctx.generic(),
                guild_id: payload.id,
            }
            .into()];
        }

        let guild = caches.guilds().get(payload.id);
        caches.remove_guild_data(payload.id);
        caches.guilds().set_unready(payload.id, false);
        caches.guilds().set_unavailable(payload.id, false);
        tracing::info!(guild_id = %payload.id, "Left guild");

        vec![GuildLeave {
            generic: ctx.generic(),
            guild_id: payload.id,
            guild,
        }
        .into()]
    }
}

// ═══════════════════════════════════════════════════════════════════
// ROLES
// ═══════════════════════════════════════════════════════════════════

pub struct GuildRoleCreateHandler;

impl GatewayEventHandler for GuildRoleCreateHandler {
    type Payload = GuildRolePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildRoleCreate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: GuildRolePayload) -> Vec<Event> {
        let mut role = payload.role;
        role.guild_id = payload.guild_id;
        ctx.caches().roles().put(payload.guild_id, role.id, role.clone());
        vec![RoleCreate {
            generic: ctx.generic(),
            guild_id: payload.guild_id,
            role,
        }
        .into()]
    }
}

pub struct GuildRoleUpdateHandler;

impl GatewayEventHandler for GuildRoleUpdateHandler {
    type Payload = GuildRolePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildRoleUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: GuildRolePayload) -> Vec<Event> {
        let mut role = payload.role;
        role.guild_id = payload.guild_id;
        let old_role = ctx.caches().roles().get(payload.guild_id, role.id);
        ctx.caches().roles().put(payload.guild_id, role.id, role.clone());
        vec![RoleUpdate {
            generic: ctx.generic(),
            guild_id: payload.guild_id,
            role,
            old_role,
        }
        .into()]
    }
}

pub struct GuildRoleDeleteHandler;

impl GatewayEventHandler for GuildRoleDeleteHandler {
    type Payload = GuildRoleDeletePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildRoleDelete
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: GuildRoleDeletePayload) -> Vec<Event> {
        let role = ctx.caches().roles().remove(payload.guild_id, payload.role_id);
        vec![RoleDelete {
            generic: ctx.generic(),
            guild_id: payload.guild_id,
            role_id: payload.role_id,
            role,
        }
        .into()]
    }
}

// ═══════════════════════════════════════════════════════════════════
// EMOJIS AND STICKERS
// ═══════════════════════════════════════════════════════════════════

/// Per-entity difference between the cached and the announced set
struct Diff<T> {
    created: Vec<T>,
    updated: Vec<(T, T)>,
    deleted: Vec<T>,
}

fn diff_by_id<T, F>(old: Vec<T>, new: &[T], id: F) -> Diff<T>
where
    T: Clone + PartialEq,
    F: Fn(&T) -> Snowflake,
{
    let mut old: HashMap<Snowflake, T> = old.into_iter().map(|e| (id(&e), e)).collect();
    let mut diff = Diff {
        created: Vec::new(),
        updated: Vec::new(),
        deleted: Vec::new(),
    };
    for entity in new {
        match old.remove(&id(entity)) {
            Some(previous) if previous != *entity => {
                diff.updated.push((entity.clone(), previous));
            }
            Some(_) => {}
            None => diff.created.push(entity.clone()),
        }
    }
    diff.deleted = old.into_values().collect();
    diff
}

/// GUILD_EMOJIS_UPDATE replaces a guild's whole emoji set.
///
/// Per-emoji events are derived by diffing against the cache, so nothing
/// is emitted while emoji caching is off.
pub struct GuildEmojisUpdateHandler;

impl GatewayEventHandler for GuildEmojisUpdateHandler {
    type Payload = GuildEmojisUpdatePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildEmojisUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: GuildEmojisUpdatePayload) -> Vec<Event> {
        let store = ctx.caches().emojis();
        if !store.is_enabled() {
            return Vec::new();
        }
        let guild_id = payload.guild_id;
        let mut emojis = payload.emojis;
        for emoji in &mut emojis {
            emoji.guild_id = guild_id;
        }

        let diff = diff_by_id(store.group_all(guild_id), &emojis, |e| e.id);
        let mut events = Vec::new();
        for emoji in diff.created {
            store.put(guild_id, emoji.id, emoji.clone());
            events.push(Event::from(EmojiCreate {
                generic: ctx.generic(),
                guild_id,
                emoji,
            }));
        }
        for (emoji, old_emoji) in diff.updated {
            store.put(guild_id, emoji.id, emoji.clone());
            events.push(Event::from(EmojiUpdate {
                generic: ctx.generic(),
                guild_id,
                emoji,
                old_emoji,
            }));
        }
        for emoji in diff.deleted {
            store.remove(guild_id, emoji.id);
            events.push(Event::from(EmojiDelete {
                generic: ctx.generic(),
                guild_id,
                emoji,
            }));
        }
        events
    }
}

/// GUILD_STICKERS_UPDATE, diffed the same way as emojis
pub struct GuildStickersUpdateHandler;

impl GatewayEventHandler for GuildStickersUpdateHandler {
    type Payload = GuildStickersUpdatePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildStickersUpdate
    }

    fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        payload: GuildStickersUpdatePayload,
    ) -> Vec<Event> {
        let store = ctx.caches().stickers();
        if !store.is_enabled() {
            return Vec::new();
        }
        let guild_id = payload.guild_id;
        let mut stickers = payload.stickers;
        for sticker in &mut stickers {
            sticker.guild_id = guild_id;
        }

        let diff = diff_by_id(store.group_all(guild_id), &stickers, |s| s.id);
        let mut events = Vec::new();
        for sticker in diff.created {
            store.put(guild_id, sticker.id, sticker.clone());
            events.push(Event::from(StickerCreate {
                generic: ctx.generic(),
                guild_id,
                sticker,
            }));
        }
        for (sticker, old_sticker) in diff.updated {
            store.put(guild_id, sticker.id, sticker.clone());
            events.push(Event::from(StickerUpdate {
                generic: ctx.generic(),
                guild_id,
                sticker,
                old_sticker,
            }));
        }
        for sticker in diff.deleted {
            store.remove(guild_id, sticker.id);
            events.push(Event::from(StickerDelete {
                generic: ctx.generic(),
                guild_id,
                sticker,
            }));
        }
        events
    }
}

// ═══════════════════════════════════════════════════════════════════
// STAGE INSTANCES
// ═══════════════════════════════════════════════════════════════════

pub struct StageInstanceCreateHandler;

impl GatewayEventHandler for StageInstanceCreateHandler {
    type Payload = StageInstance;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::StageInstanceCreate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, stage_instance: StageInstance) -> Vec<Event> {
        ctx.caches().stage_instances().put(
            stage_instance.guild_id,
            stage_instance.id,
            stage_instance.clone(),
        );
        vec![StageInstanceCreate {
            generic: ctx.generic(),
            stage_instance,
        }
        .into()]
    }
}

pub struct StageInstanceUpdateHandler;

impl GatewayEventHandler for StageInstanceUpdateHandler {
    type Payload = StageInstance;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::StageInstanceUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, stage_instance: StageInstance) -> Vec<Event> {
        let store = ctx.caches().stage_instances();
        let old_stage_instance = store.get(stage_instance.guild_id, stage_instance.id);
        store.put(stage_instance.guild_id, stage_instance.id, stage_instance.clone());
        vec![StageInstanceUpdate {
            generic: ctx.generic(),
            stage_instance,
            old_stage_instance,
        }
        .into()]
    }
}

pub struct StageInstanceDeleteHandler;

impl GatewayEventHandler for StageInstanceDeleteHandler {
    type Payload = StageInstance;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::StageInstanceDelete
    }

    fn handle(&self, ctx: &HandlerContext<'_>, stage_instance: StageInstance) -> Vec<Event> {
        ctx.caches()
            .stage_instances()
            .remove(stage_instance.guild_id, stage_instance.id);
        vec![StageInstanceDelete {
            generic: ctx.generic(),
            stage_instance,
        }
        .into()]
    }
}

// ═══════════════════════════════════════════════════════════════════
// SCHEDULED EVENTS
// ═══════════════════════════════════════════════════════════════════

pub struct GuildScheduledEventCreateHandler;

impl GatewayEventHandler for GuildScheduledEventCreateHandler {
    type Payload = GuildScheduledEvent;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildScheduledEventCreate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, scheduled_event: GuildScheduledEvent) -> Vec<Event> {
        ctx.caches().scheduled_events().put(
            scheduled_event.guild_id,
            scheduled_event.id,
            scheduled_event.clone(),
        );
        vec![GuildScheduledEventCreate {
            generic: ctx.generic(),
            scheduled_event,
        }
        .into()]
    }
}

pub struct GuildScheduledEventUpdateHandler;

impl GatewayEventHandler for GuildScheduledEventUpdateHandler {
    type Payload = GuildScheduledEvent;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildScheduledEventUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, scheduled_event: GuildScheduledEvent) -> Vec<Event> {
        let store = ctx.caches().scheduled_events();
        let old_scheduled_event = store.get(scheduled_event.guild_id, scheduled_event.id);
        store.put(scheduled_event.guild_id, scheduled_event.id, scheduled_event.clone());
        vec![GuildScheduledEventUpdate {
            generic: ctx.generic(),
            scheduled_event,
            old_scheduled_event,
        }
        .into()]
    }
}

pub struct GuildScheduledEventDeleteHandler;

impl GatewayEventHandler for GuildScheduledEventDeleteHandler {
    type Payload = GuildScheduledEvent;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildScheduledEventDelete
    }

    fn handle(&self, ctx: &HandlerContext<'_>, scheduled_event: GuildScheduledEvent) -> Vec<Event> {
        ctx.caches()
            .scheduled_events()
            .remove(scheduled_event.guild_id, scheduled_event.id);
        vec![GuildScheduledEventDelete {
            generic: ctx.generic(),
            scheduled_event,
        }
        .into()]
    }
}
