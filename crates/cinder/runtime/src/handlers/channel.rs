//! Channel and thread handlers

use cinder_types::{
    Channel, ChannelPinsUpdatePayload, GatewayEventType, GuildChannel, ThreadDeletePayload,
    ThreadMemberUpdatePayload,
};

use super::{GatewayEventHandler, HandlerContext};
use crate::events::{
    ChannelPinsUpdate, DmChannelCreate, DmChannelDelete, DmChannelUpdate, Event,
    GuildChannelCreate, GuildChannelDelete, GuildChannelUpdate, ThreadCreate, ThreadDelete,
    ThreadMemberUpdate, ThreadUpdate,
};

pub struct ChannelCreateHandler;

impl GatewayEventHandler for ChannelCreateHandler {
    type Payload = Channel;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ChannelCreate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, channel: Channel) -> Vec<Event> {
        match channel {
            Channel::Guild(channel) => {
                ctx.caches().channels().put(channel.clone());
                vec![GuildChannelCreate {
                    generic: ctx.generic(),
                    channel,
                }
                .into()]
            }
            Channel::Dm(channel) => vec![DmChannelCreate {
                generic: ctx.generic(),
                channel,
            }
            .into()],
        }
    }
}

pub struct ChannelUpdateHandler;

impl GatewayEventHandler for ChannelUpdateHandler {
    type Payload = Channel;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ChannelUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, channel: Channel) -> Vec<Event> {
        match channel {
            Channel::Guild(channel) => {
                let old_channel = ctx.caches().channels().get(channel.id());
                ctx.caches().channels().put(channel.clone());
                vec![GuildChannelUpdate {
                    generic: ctx.generic(),
                    channel,
                    old_channel,
                }
                .into()]
            }
            Channel::Dm(channel) => vec![DmChannelUpdate {
                generic: ctx.generic(),
                channel,
            }
            .into()],
        }
    }
}

/// CHANNEL_DELETE also drops the channel's cached messages
pub struct ChannelDeleteHandler;

impl GatewayEventHandler for ChannelDeleteHandler {
    type Payload = Channel;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ChannelDelete
    }

    fn handle(&self, ctx: &HandlerContext<'_>, channel: Channel) -> Vec<Event> {
        let caches = ctx.caches();
        caches.messages().remove_group(channel.id());
        match channel {
            Channel::Guild(channel) => {
                caches.channels().remove(channel.id());
                vec![GuildChannelDelete {
                    generic: ctx.generic(),
                    channel,
                }
                .into()]
            }
            Channel::Dm(channel) => vec![DmChannelDelete {
                generic: ctx.generic(),
                channel,
            }
            .into()],
        }
    }
}

pub struct ChannelPinsUpdateHandler;

impl GatewayEventHandler for ChannelPinsUpdateHandler {
    type Payload = ChannelPinsUpdatePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ChannelPinsUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: ChannelPinsUpdatePayload) -> Vec<Event> {
        let mut old_last_pin_timestamp = None;
        ctx.caches().channels().update(payload.channel_id, |channel| {
            old_last_pin_timestamp = channel.last_pin_timestamp();
            channel.set_last_pin_timestamp(payload.last_pin_timestamp);
        });
        vec![ChannelPinsUpdate {
            generic: ctx.generic(),
            guild_id: payload.guild_id,
            channel_id: payload.channel_id,
            last_pin_timestamp: payload.last_pin_timestamp,
            old_last_pin_timestamp,
        }
        .into()]
    }
}

// ═══════════════════════════════════════════════════════════════════
// THREADS
// ═══════════════════════════════════════════════════════════════════

pub struct ThreadCreateHandler;

impl GatewayEventHandler for ThreadCreateHandler {
    type Payload = GuildChannel;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ThreadCreate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, thread: GuildChannel) -> Vec<Event> {
        ctx.caches().channels().put(thread.clone());
        vec![ThreadCreate {
            generic: ctx.generic(),
            thread,
        }
        .into()]
    }
}

pub struct ThreadUpdateHandler;

impl GatewayEventHandler for ThreadUpdateHandler {
    type Payload = GuildChannel;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ThreadUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, thread: GuildChannel) -> Vec<Event> {
        let old_thread = ctx.caches().channels().get(thread.id());
        ctx.caches().channels().put(thread.clone());
        vec![ThreadUpdate {
            generic: ctx.generic(),
            thread,
            old_thread,
        }
        .into()]
    }
}

/// THREAD_DELETE drops the thread with its members and messages
pub struct ThreadDeleteHandler;

impl GatewayEventHandler for ThreadDeleteHandler {
    type Payload = ThreadDeletePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ThreadDelete
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: ThreadDeletePayload) -> Vec<Event> {
        let caches = ctx.caches();
        let thread = caches.channels().remove(payload.id);
        caches.thread_members().remove_group(payload.id);
        caches.messages().remove_group(payload.id);
        vec![ThreadDelete {
            generic: ctx.generic(),
            guild_id: payload.guild_id,
            thread_id: payload.id,
            parent_id: payload.parent_id,
            kind: payload.kind,
            thread,
        }
        .into()]
    }
}

/// THREAD_MEMBER_UPDATE concerns the local actor's own thread membership
pub struct ThreadMemberUpdateHandler;

impl GatewayEventHandler for ThreadMemberUpdateHandler {
    type Payload = ThreadMemberUpdatePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ThreadMemberUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: ThreadMemberUpdatePayload) -> Vec<Event> {
        let member = payload.member;
        ctx.caches()
            .thread_members()
            .put(member.id, member.user_id, member.clone());
        vec![ThreadMemberUpdate {
            generic: ctx.generic(),
            guild_id: payload.guild_id,
            member,
        }
        .into()]
    }
}
