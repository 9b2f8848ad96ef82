//! Gateway event tags and dispatch payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::channel::{ChannelType, GuildChannel};
use crate::emoji::{Emoji, Sticker};
use crate::guild::{Guild, UnavailableGuild};
use crate::member::{Member, ThreadMember};
use crate::message::ReactionEmoji;
use crate::presence::Presence;
use crate::role::Role;
use crate::scheduled::GuildScheduledEvent;
use crate::snowflake::Snowflake;
use crate::user::{SelfUser, User};
use crate::voice::{StageInstance, VoiceState};

macro_rules! gateway_event_types {
    ($($variant:ident => $tag:literal,)*) => {
        /// Wire tag of a gateway dispatch
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum GatewayEventType {
            $($variant,)*
            /// A tag this model has no name for.
            Unknown(String),
        }

        impl GatewayEventType {
            pub fn as_str(&self) -> &str {
                match self {
                    $(GatewayEventType::$variant => $tag,)*
                    GatewayEventType::Unknown(tag) => tag,
                }
            }
        }

        impl From<&str> for GatewayEventType {
            fn from(tag: &str) -> Self {
                match tag {
                    $($tag => GatewayEventType::$variant,)*
                    other => GatewayEventType::Unknown(other.to_string()),
                }
            }
        }
    };
}

gateway_event_types! {
    Ready => "READY",
    Resumed => "RESUMED",
    GuildCreate => "GUILD_CREATE",
    GuildUpdate => "GUILD_UPDATE",
    GuildDelete => "GUILD_DELETE",
    ChannelCreate => "CHANNEL_CREATE",
    ChannelUpdate => "CHANNEL_UPDATE",
    ChannelDelete => "CHANNEL_DELETE",
    ChannelPinsUpdate => "CHANNEL_PINS_UPDATE",
    ThreadCreate => "THREAD_CREATE",
    ThreadUpdate => "THREAD_UPDATE",
    ThreadDelete => "THREAD_DELETE",
    ThreadMemberUpdate => "THREAD_MEMBER_UPDATE",
    GuildRoleCreate => "GUILD_ROLE_CREATE",
    GuildRoleUpdate => "GUILD_ROLE_UPDATE",
    GuildRoleDelete => "GUILD_ROLE_DELETE",
    GuildMemberAdd => "GUILD_MEMBER_ADD",
    GuildMemberUpdate => "GUILD_MEMBER_UPDATE",
    GuildMemberRemove => "GUILD_MEMBER_REMOVE",
    MessageCreate => "MESSAGE_CREATE",
    MessageUpdate => "MESSAGE_UPDATE",
    MessageDelete => "MESSAGE_DELETE",
    MessageReactionAdd => "MESSAGE_REACTION_ADD",
    MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
    MessageReactionRemoveAll => "MESSAGE_REACTION_REMOVE_ALL",
    MessageReactionRemoveEmoji => "MESSAGE_REACTION_REMOVE_EMOJI",
    PresenceUpdate => "PRESENCE_UPDATE",
    VoiceStateUpdate => "VOICE_STATE_UPDATE",
    VoiceServerUpdate => "VOICE_SERVER_UPDATE",
    GuildEmojisUpdate => "GUILD_EMOJIS_UPDATE",
    GuildStickersUpdate => "GUILD_STICKERS_UPDATE",
    StageInstanceCreate => "STAGE_INSTANCE_CREATE",
    StageInstanceUpdate => "STAGE_INSTANCE_UPDATE",
    StageInstanceDelete => "STAGE_INSTANCE_DELETE",
    GuildScheduledEventCreate => "GUILD_SCHEDULED_EVENT_CREATE",
    GuildScheduledEventUpdate => "GUILD_SCHEDULED_EVENT_UPDATE",
    GuildScheduledEventDelete => "GUILD_SCHEDULED_EVENT_DELETE",
    InteractionCreate => "INTERACTION_CREATE",
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════
// DISPATCH PAYLOADS
// ═══════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadyPayload {
    #[serde(rename = "v", default)]
    pub version: u8,
    pub user: SelfUser,
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub resume_gateway_url: Option<String>,
}

/// A full guild with everything the gateway ships alongside it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildCreatePayload {
    #[serde(flatten)]
    pub guild: Guild,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub channels: Vec<GuildChannel>,
    #[serde(default)]
    pub threads: Vec<GuildChannel>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub presences: Vec<Presence>,
    #[serde(default)]
    pub voice_states: Vec<VoiceState>,
    #[serde(default)]
    pub emojis: Vec<Emoji>,
    #[serde(default)]
    pub stickers: Vec<Sticker>,
    #[serde(default)]
    pub stage_instances: Vec<StageInstance>,
    #[serde(default)]
    pub guild_scheduled_events: Vec<GuildScheduledEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelPinsUpdatePayload {
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub last_pin_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadDeletePayload {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
    #[serde(rename = "type")]
    pub kind: ChannelType,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadMemberUpdatePayload {
    #[serde(flatten)]
    pub member: ThreadMember,
    pub guild_id: Snowflake,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildRolePayload {
    pub guild_id: Snowflake,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildRoleDeletePayload {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildMemberRemovePayload {
    pub guild_id: Snowflake,
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageDeletePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageReactionAddPayload {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub member: Option<Member>,
    pub emoji: ReactionEmoji,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageReactionRemovePayload {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub emoji: ReactionEmoji,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageReactionRemoveAllPayload {
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageReactionRemoveEmojiPayload {
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub emoji: ReactionEmoji,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildEmojisUpdatePayload {
    pub guild_id: Snowflake,
    #[serde(default)]
    pub emojis: Vec<Emoji>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildStickersUpdatePayload {
    pub guild_id: Snowflake,
    #[serde(default)]
    pub stickers: Vec<Sticker>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_round_trip_through_str() {
        let tag = GatewayEventType::from("GUILD_MEMBER_UPDATE");
        assert_eq!(tag, GatewayEventType::GuildMemberUpdate);
        assert_eq!(tag.as_str(), "GUILD_MEMBER_UPDATE");
    }

    #[test]
    fn unknown_tag_is_preserved() {
        let tag = GatewayEventType::from("AUTO_MODERATION_ACTION_EXECUTION");
        assert_eq!(tag.to_string(), "AUTO_MODERATION_ACTION_EXECUTION");
        assert!(matches!(tag, GatewayEventType::Unknown(_)));
    }

    #[test]
    fn guild_create_carries_nested_entities() {
        let payload: GuildCreatePayload = serde_json::from_value(json!({
            "id": "1",
            "name": "den",
            "owner_id": "5",
            "roles": [{"id": "1", "permissions": "1024"}],
            "channels": [{"id": "20", "type": 0, "name": "general"}],
            "members": [{"user": {"id": "5", "username": "kit"}, "roles": []}]
        }))
        .unwrap();

        assert_eq!(payload.guild.name, "den");
        assert_eq!(payload.roles.len(), 1);
        assert_eq!(payload.channels[0].name(), "general");
        assert_eq!(payload.members[0].user_id(), Snowflake::new(5));
    }
}
