use cinder_types::{Member, Presence, Snowflake, User, VoiceState};

use super::GenericEvent;

#[derive(Debug, Clone)]
pub struct GuildMemberJoin {
    pub generic: GenericEvent,
    pub member: Member,
}

#[derive(Debug, Clone)]
pub struct GuildMemberUpdate {
    pub generic: GenericEvent,
    pub member: Member,
    pub old_member: Option<Member>,
}

#[derive(Debug, Clone)]
pub struct GuildMemberLeave {
    pub generic: GenericEvent,
    pub guild_id: Snowflake,
    pub user: User,
    pub member: Option<Member>,
}

#[derive(Debug, Clone)]
pub struct PresenceUpdate {
    pub generic: GenericEvent,
    pub presence: Presence,
    pub old_presence: Option<Presence>,
}

/// A user joined, moved within or left voice.
#[derive(Debug, Clone)]
pub struct VoiceStateUpdate {
    pub generic: GenericEvent,
    pub state: VoiceState,
    pub old_state: Option<VoiceState>,
}

#[derive(Debug, Clone)]
pub struct VoiceServerUpdate {
    pub generic: GenericEvent,
    pub update: cinder_types::VoiceServerUpdate,
}
