//! Membership, presence and voice handlers

use cinder_types::{
    GatewayEventType, GuildMemberRemovePayload, Member, Presence, Snowflake, VoiceServerUpdate,
    VoiceState,
};

use super::{GatewayEventHandler, HandlerContext};
use crate::events::{
    self, Event, GuildMemberJoin, GuildMemberLeave, GuildMemberUpdate, PresenceUpdate,
    VoiceStateUpdate,
};

fn adjust_member_count(ctx: &HandlerContext<'_>, guild_id: Snowflake, delta: i64) {
    let guilds = ctx.caches().guilds();
    if let Some(mut guild) = guilds.get(guild_id) {
        if let Some(count) = guild.member_count {
            guild.member_count = Some(count.saturating_add_signed(delta));
            guilds.put(guild);
        }
    }
}

pub struct GuildMemberAddHandler;

impl GatewayEventHandler for GuildMemberAddHandler {
    type Payload = Member;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildMemberAdd
    }

    fn handle(&self, ctx: &HandlerContext<'_>, member: Member) -> Vec<Event> {
        adjust_member_count(ctx, member.guild_id, 1);
        ctx.caches()
            .members()
            .put(member.guild_id, member.user_id(), member.clone());
        vec![GuildMemberJoin {
            generic: ctx.generic(),
            member,
        }
        .into()]
    }
}

pub struct GuildMemberUpdateHandler;

impl GatewayEventHandler for GuildMemberUpdateHandler {
    type Payload = Member;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildMemberUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, member: Member) -> Vec<Event> {
        let members = ctx.caches().members();
        let old_member = members.get(member.guild_id, member.user_id());
        members.put(member.guild_id, member.user_id(), member.clone());
        vec![GuildMemberUpdate {
            generic: ctx.generic(),
            member,
            old_member,
        }
        .into()]
    }
}

pub struct GuildMemberRemoveHandler;

impl GatewayEventHandler for GuildMemberRemoveHandler {
    type Payload = GuildMemberRemovePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::GuildMemberRemove
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: GuildMemberRemovePayload) -> Vec<Event> {
        adjust_member_count(ctx, payload.guild_id, -1);
        let member = ctx
            .caches()
            .members()
            .remove(payload.guild_id, payload.user.id);
        vec![GuildMemberLeave {
            generic: ctx.generic(),
            guild_id: payload.guild_id,
            user: payload.user,
            member,
        }
        .into()]
    }
}

pub struct PresenceUpdateHandler;

impl GatewayEventHandler for PresenceUpdateHandler {
    type Payload = Presence;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::PresenceUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, presence: Presence) -> Vec<Event> {
        let presences = ctx.caches().presences();
        let old_presence = presences.get(presence.guild_id, presence.user_id());
        presences.put(presence.guild_id, presence.user_id(), presence.clone());
        vec![PresenceUpdate {
            generic: ctx.generic(),
            presence,
            old_presence,
        }
        .into()]
    }
}

// ═══════════════════════════════════════════════════════════════════
// VOICE
// ═══════════════════════════════════════════════════════════════════

/// VOICE_STATE_UPDATE: a state without a channel is a disconnect.
///
/// The local actor's own states are also handed to the voice interceptor,
/// before listeners see the event.
pub struct VoiceStateUpdateHandler;

impl GatewayEventHandler for VoiceStateUpdateHandler {
    type Payload = VoiceState;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::VoiceStateUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, mut state: VoiceState) -> Vec<Event> {
        let caches = ctx.caches();
        let guild_id = state.guild_id.unwrap_or(Snowflake::ZERO);
        // the nested member carries no guild id on the wire
        if let Some(member) = state.member.as_mut() {
            member.guild_id = guild_id;
        }

        let old_state = caches.voice_states().get(guild_id, state.user_id);
        if state.channel_id.is_some() {
            caches.voice_states().put(guild_id, state.user_id, state.clone());
        } else {
            caches.voice_states().remove(guild_id, state.user_id);
        }
        if let Some(member) = &state.member {
            caches.members().put(guild_id, member.user_id(), member.clone());
        }

        if caches.identity().is(state.user_id) {
            if let Some(interceptor) = ctx.voice_interceptor() {
                interceptor.on_voice_state_update(&state);
            }
        }

        vec![VoiceStateUpdate {
            generic: ctx.generic(),
            state,
            old_state,
        }
        .into()]
    }
}

pub struct VoiceServerUpdateHandler;

impl GatewayEventHandler for VoiceServerUpdateHandler {
    type Payload = VoiceServerUpdate;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::VoiceServerUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, update: VoiceServerUpdate) -> Vec<Event> {
        if let Some(interceptor) = ctx.voice_interceptor() {
            interceptor.on_voice_server_update(&update);
        }
        vec![events::VoiceServerUpdate {
            generic: ctx.generic(),
            update,
        }
        .into()]
    }
}
