use cinder_types::{Member, Message, ReactionEmoji, Snowflake};

use super::GenericEvent;

#[derive(Debug, Clone)]
pub struct MessageCreate {
    pub generic: GenericEvent,
    pub message: Message,
}

#[derive(Debug, Clone)]
pub struct MessageUpdate {
    pub generic: GenericEvent,
    pub message: Message,
    pub old_message: Option<Message>,
}

#[derive(Debug, Clone)]
pub struct MessageDelete {
    pub generic: GenericEvent,
    pub message_id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub message: Option<Message>,
}

/// Reaction events are split by where the message lives: guild variants
/// carry the guild id, DM variants have none.
#[derive(Debug, Clone)]
pub struct GuildMessageReactionAdd {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub member: Option<Member>,
    pub emoji: ReactionEmoji,
}

#[derive(Debug, Clone)]
pub struct GuildMessageReactionRemove {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub emoji: ReactionEmoji,
}

#[derive(Debug, Clone)]
pub struct GuildMessageReactionRemoveAll {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
}

#[derive(Debug, Clone)]
pub struct GuildMessageReactionRemoveEmoji {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub emoji: ReactionEmoji,
}

#[derive(Debug, Clone)]
pub struct DmMessageReactionAdd {
    pub generic: GenericEvent,
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub emoji: ReactionEmoji,
}

#[derive(Debug, Clone)]
pub struct DmMessageReactionRemove {
    pub generic: GenericEvent,
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub emoji: ReactionEmoji,
}

#[derive(Debug, Clone)]
pub struct DmMessageReactionRemoveAll {
    pub generic: GenericEvent,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
}

#[derive(Debug, Clone)]
pub struct DmMessageReactionRemoveEmoji {
    pub generic: GenericEvent,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub emoji: ReactionEmoji,
}
