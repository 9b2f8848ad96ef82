use cinder_types::{
    Emoji, Guild, GuildScheduledEvent, Role, SelfUser, Snowflake, StageInstance, Sticker,
};

use super::GenericEvent;

/// Identity handshake completed
#[derive(Debug, Clone)]
pub struct Ready {
    pub generic: GenericEvent,
    pub self_user: SelfUser,
    pub session_id: String,
    /// Guilds announced by the handshake, delivered later by GUILD_CREATE.
    pub guild_ids: Vec<Snowflake>,
}

#[derive(Debug, Clone)]
pub struct Resumed {
    pub generic: GenericEvent,
}

/// The local actor joined a guild.
#[derive(Debug, Clone)]
pub struct GuildJoin {
    pub generic: GenericEvent,
    pub guild: Guild,
}

/// A guild came back after an outage.
#[derive(Debug, Clone)]
pub struct GuildAvailable {
    pub generic: GenericEvent,
    pub guild: Guild,
}

/// A guild announced by READY was delivered.
#[derive(Debug, Clone)]
pub struct GuildReady {
    pub generic: GenericEvent,
    pub guild: Guild,
}

/// Every guild announced by READY was delivered.
#[derive(Debug, Clone)]
pub struct GuildsReady {
    pub generic: GenericEvent,
}

#[derive(Debug, Clone)]
pub struct GuildUpdate {
    pub generic: GenericEvent,
    pub guild: Guild,
    pub old_guild: Option<Guild>,
}

/// The local actor left or was removed from a guild.
#[derive(Debug, Clone)]
pub struct GuildLeave {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub guild: Option<Guild>,
}

/// A guild went down.
#[derive(Debug, Clone)]
pub struct GuildUnavailable {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
}

#[derive(Debug, Clone)]
pub struct RoleCreate {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct RoleUpdate {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub role: Role,
    pub old_role: Option<Role>,
}

#[derive(Debug, Clone)]
pub struct RoleDelete {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
    pub role: Option<Role>,
}

#[derive(Debug, Clone)]
pub struct EmojiCreate {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub emoji: Emoji,
}

#[derive(Debug, Clone)]
pub struct EmojiUpdate {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub emoji: Emoji,
    pub old_emoji: Emoji,
}

#[derive(Debug, Clone)]
pub struct EmojiDelete {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub emoji: Emoji,
}

#[derive(Debug, Clone)]
pub struct StickerCreate {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub sticker: Sticker,
}

#[derive(Debug, Clone)]
pub struct StickerUpdate {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub sticker: Sticker,
    pub old_sticker: Sticker,
}

#[derive(Debug, Clone)]
pub struct StickerDelete {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub sticker: Sticker,
}

#[derive(Debug, Clone)]
pub struct StageInstanceCreate {
    pub generic: GenericEvent,
    pub stage_instance: StageInstance,
}

#[derive(Debug, Clone)]
pub struct StageInstanceUpdate {
    pub generic: GenericEvent,
    pub stage_instance: StageInstance,
    pub old_stage_instance: Option<StageInstance>,
}

#[derive(Debug, Clone)]
pub struct StageInstanceDelete {
    pub generic: GenericEvent,
    pub stage_instance: StageInstance,
}

#[derive(Debug, Clone)]
pub struct GuildScheduledEventCreate {
    pub generic: GenericEvent,
    pub scheduled_event: GuildScheduledEvent,
}

#[derive(Debug, Clone)]
pub struct GuildScheduledEventUpdate {
    pub generic: GenericEvent,
    pub scheduled_event: GuildScheduledEvent,
    pub old_scheduled_event: Option<GuildScheduledEvent>,
}

#[derive(Debug, Clone)]
pub struct GuildScheduledEventDelete {
    pub generic: GenericEvent,
    pub scheduled_event: GuildScheduledEvent,
}
