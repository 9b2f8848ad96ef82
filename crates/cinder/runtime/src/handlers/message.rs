//! Message and reaction handlers
//!
//! Messages are cached per channel. Reactions are folded into the cached
//! message's reaction counts when it is present and dispatched as guild or
//! DM events depending on whether the payload names a guild.

use cinder_types::{
    GatewayEventType, Message, MessageDeletePayload, MessageReaction, MessageReactionAddPayload,
    MessageReactionRemoveAllPayload, MessageReactionRemoveEmojiPayload,
    MessageReactionRemovePayload, ReactionEmoji, Snowflake,
};

use super::{GatewayEventHandler, HandlerContext};
use crate::events::{
    DmMessageReactionAdd, DmMessageReactionRemove, DmMessageReactionRemoveAll,
    DmMessageReactionRemoveEmoji, Event, GuildMessageReactionAdd, GuildMessageReactionRemove,
    GuildMessageReactionRemoveAll, GuildMessageReactionRemoveEmoji, MessageCreate,
    MessageDelete, MessageUpdate,
};

pub struct MessageCreateHandler;

impl GatewayEventHandler for MessageCreateHandler {
    type Payload = Message;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::MessageCreate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, message: Message) -> Vec<Event> {
        ctx.caches()
            .messages()
            .put(message.channel_id, message.id, message.clone());
        vec![MessageCreate {
            generic: ctx.generic(),
            message,
        }
        .into()]
    }
}

pub struct MessageUpdateHandler;

impl GatewayEventHandler for MessageUpdateHandler {
    type Payload = Message;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::MessageUpdate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, message: Message) -> Vec<Event> {
        let messages = ctx.caches().messages();
        let old_message = messages.get(message.channel_id, message.id);
        messages.put(message.channel_id, message.id, message.clone());
        vec![MessageUpdate {
            generic: ctx.generic(),
            message,
            old_message,
        }
        .into()]
    }
}

pub struct MessageDeleteHandler;

impl GatewayEventHandler for MessageDeleteHandler {
    type Payload = MessageDeletePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::MessageDelete
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: MessageDeletePayload) -> Vec<Event> {
        let message = ctx.caches().messages().remove(payload.channel_id, payload.id);
        vec![MessageDelete {
            generic: ctx.generic(),
            message_id: payload.id,
            channel_id: payload.channel_id,
            guild_id: payload.guild_id,
            message,
        }
        .into()]
    }
}

// ═══════════════════════════════════════════════════════════════════
// REACTIONS
// ═══════════════════════════════════════════════════════════════════

/// Rewrites a cached message's reactions in place; no-op when uncached.
fn update_reactions<F>(
    ctx: &HandlerContext<'_>,
    channel_id: Snowflake,
    message_id: Snowflake,
    f: F,
) where
    F: FnOnce(&mut Vec<MessageReaction>),
{
    let messages = ctx.caches().messages();
    if let Some(mut message) = messages.get(channel_id, message_id) {
        f(&mut message.reactions);
        messages.put(channel_id, message_id, message);
    }
}

pub struct MessageReactionAddHandler;

impl GatewayEventHandler for MessageReactionAddHandler {
    type Payload = MessageReactionAddPayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::MessageReactionAdd
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: MessageReactionAddPayload) -> Vec<Event> {
        let me = ctx.caches().identity().is(payload.user_id);
        update_reactions(ctx, payload.channel_id, payload.message_id, |reactions| {
            match reactions.iter_mut().find(|r| r.emoji == payload.emoji) {
                Some(reaction) => {
                    reaction.count += 1;
                    reaction.me |= me;
                }
                None => reactions.push(MessageReaction {
                    count: 1,
                    me,
                    emoji: payload.emoji.clone(),
                }),
            }
        });
        let event: Event = match payload.guild_id {
            Some(guild_id) => GuildMessageReactionAdd {
                generic: ctx.generic(),
                guild_id,
                user_id: payload.user_id,
                channel_id: payload.channel_id,
                message_id: payload.message_id,
                member: payload.member,
                emoji: payload.emoji,
            }
            .into(),
            None => DmMessageReactionAdd {
                generic: ctx.generic(),
                user_id: payload.user_id,
                channel_id: payload.channel_id,
                message_id: payload.message_id,
                emoji: payload.emoji,
            }
            .into(),
        };
        vec![event]
    }
}

pub struct MessageReactionRemoveHandler;

impl GatewayEventHandler for MessageReactionRemoveHandler {
    type Payload = MessageReactionRemovePayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::MessageReactionRemove
    }

    fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        payload: MessageReactionRemovePayload,
    ) -> Vec<Event> {
        let me = ctx.caches().identity().is(payload.user_id);
        update_reactions(ctx, payload.channel_id, payload.message_id, |reactions| {
            remove_one(reactions, &payload.emoji, me);
        });
        let event: Event = match payload.guild_id {
            Some(guild_id) => GuildMessageReactionRemove {
                generic: ctx.generic(),
                guild_id,
                user_id: payload.user_id,
                channel_id: payload.channel_id,
                message_id: payload.message_id,
                emoji: payload.emoji,
            }
            .into(),
            None => DmMessageReactionRemove {
                generic: ctx.generic(),
                user_id: payload.user_id,
                channel_id: payload.channel_id,
                message_id: payload.message_id,
                emoji: payload.emoji,
            }
            .into(),
        };
        vec![event]
    }
}

fn remove_one(reactions: &mut Vec<MessageReaction>, emoji: &ReactionEmoji, me: bool) {
    if let Some(reaction) = reactions.iter_mut().find(|r| r.emoji == *emoji) {
        reaction.count = reaction.count.saturating_sub(1);
        if me {
            reaction.me = false;
        }
    }
    reactions.retain(|r| r.count > 0);
}

pub struct MessageReactionRemoveAllHandler;

impl GatewayEventHandler for MessageReactionRemoveAllHandler {
    type Payload = MessageReactionRemoveAllPayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::MessageReactionRemoveAll
    }

    fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        payload: MessageReactionRemoveAllPayload,
    ) -> Vec<Event> {
        update_reactions(ctx, payload.channel_id, payload.message_id, Vec::clear);
        let event: Event = match payload.guild_id {
            Some(guild_id) => GuildMessageReactionRemoveAll {
                generic: ctx.generic(),
                guild_id,
                channel_id: payload.channel_id,
                message_id: payload.message_id,
            }
            .into(),
            None => DmMessageReactionRemoveAll {
                generic: ctx.generic(),
                channel_id: payload.channel_id,
                message_id: payload.message_id,
            }
            .into(),
        };
        vec![event]
    }
}

pub struct MessageReactionRemoveEmojiHandler;

impl GatewayEventHandler for MessageReactionRemoveEmojiHandler {
    type Payload = MessageReactionRemoveEmojiPayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::MessageReactionRemoveEmoji
    }

    fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        payload: MessageReactionRemoveEmojiPayload,
    ) -> Vec<Event> {
        update_reactions(ctx, payload.channel_id, payload.message_id, |reactions| {
            reactions.retain(|r| r.emoji != payload.emoji);
        });
        let event: Event = match payload.guild_id {
            Some(guild_id) => GuildMessageReactionRemoveEmoji {
                generic: ctx.generic(),
                guild_id,
                channel_id: payload.channel_id,
                message_id: payload.message_id,
                emoji: payload.emoji,
            }
            .into(),
            None => DmMessageReactionRemoveEmoji {
                generic: ctx.generic(),
                channel_id: payload.channel_id,
                message_id: payload.message_id,
                emoji: payload.emoji,
            }
            .into(),
        };
        vec![event]
    }
}
