use chrono::{DateTime, Utc};
use cinder_types::{ChannelType, DmChannel, GuildChannel, Snowflake, ThreadMember};

use super::GenericEvent;

#[derive(Debug, Clone)]
pub struct GuildChannelCreate {
    pub generic: GenericEvent,
    pub channel: GuildChannel,
}

#[derive(Debug, Clone)]
pub struct GuildChannelUpdate {
    pub generic: GenericEvent,
    pub channel: GuildChannel,
    pub old_channel: Option<GuildChannel>,
}

#[derive(Debug, Clone)]
pub struct GuildChannelDelete {
    pub generic: GenericEvent,
    pub channel: GuildChannel,
}

#[derive(Debug, Clone)]
pub struct DmChannelCreate {
    pub generic: GenericEvent,
    pub channel: DmChannel,
}

#[derive(Debug, Clone)]
pub struct DmChannelUpdate {
    pub generic: GenericEvent,
    pub channel: DmChannel,
}

#[derive(Debug, Clone)]
pub struct DmChannelDelete {
    pub generic: GenericEvent,
    pub channel: DmChannel,
}

/// A message was pinned or unpinned. `guild_id` is `None` in direct messages.
#[derive(Debug, Clone)]
pub struct ChannelPinsUpdate {
    pub generic: GenericEvent,
    pub guild_id: Option<Snowflake>,
    pub channel_id: Snowflake,
    pub last_pin_timestamp: Option<DateTime<Utc>>,
    pub old_last_pin_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ThreadCreate {
    pub generic: GenericEvent,
    pub thread: GuildChannel,
}

#[derive(Debug, Clone)]
pub struct ThreadUpdate {
    pub generic: GenericEvent,
    pub thread: GuildChannel,
    pub old_thread: Option<GuildChannel>,
}

#[derive(Debug, Clone)]
pub struct ThreadDelete {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub thread_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub kind: ChannelType,
    pub thread: Option<GuildChannel>,
}

#[derive(Debug, Clone)]
pub struct ThreadMemberUpdate {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub member: ThreadMember,
}
