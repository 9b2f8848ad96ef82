//! Channels
//!
//! Channels arrive as one JSON object shape discriminated by an integer
//! `type` field. They decode into a closed sum type so callers dispatch on the
//! variant instead of probing for fields.

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::errors::TypesError;
use crate::permissions::Permissions;
use crate::snowflake::Snowflake;
use crate::user::User;

/// Raw channel type discriminants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChannelType {
    #[default]
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildNews,
    GuildNewsThread,
    GuildPublicThread,
    GuildPrivateThread,
    GuildStageVoice,
    GuildForum,
}

impl ChannelType {
    pub fn code(self) -> u8 {
        match self {
            ChannelType::GuildText => 0,
            ChannelType::Dm => 1,
            ChannelType::GuildVoice => 2,
            ChannelType::GroupDm => 3,
            ChannelType::GuildCategory => 4,
            ChannelType::GuildNews => 5,
            ChannelType::GuildNewsThread => 10,
            ChannelType::GuildPublicThread => 11,
            ChannelType::GuildPrivateThread => 12,
            ChannelType::GuildStageVoice => 13,
            ChannelType::GuildForum => 15,
        }
    }

    pub fn is_thread(self) -> bool {
        matches!(
            self,
            ChannelType::GuildNewsThread
                | ChannelType::GuildPublicThread
                | ChannelType::GuildPrivateThread
        )
    }
}

impl TryFrom<u64> for ChannelType {
    type Error = TypesError;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => ChannelType::GuildText,
            1 => ChannelType::Dm,
            2 => ChannelType::GuildVoice,
            3 => ChannelType::GroupDm,
            4 => ChannelType::GuildCategory,
            5 => ChannelType::GuildNews,
            10 => ChannelType::GuildNewsThread,
            11 => ChannelType::GuildPublicThread,
            12 => ChannelType::GuildPrivateThread,
            13 => ChannelType::GuildStageVoice,
            15 => ChannelType::GuildForum,
            other => return Err(TypesError::UnknownChannelType(other)),
        })
    }
}

impl From<ChannelType> for u8 {
    fn from(kind: ChannelType) -> Self {
        kind.code()
    }
}

impl TryFrom<u8> for ChannelType {
    type Error = TypesError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ChannelType::try_from(u64::from(code))
    }
}

impl Serialize for ChannelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ChannelType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u64::deserialize(deserializer)?;
        ChannelType::try_from(code).map_err(de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════
// PERMISSION OVERWRITES
// ═══════════════════════════════════════════════════════════════════

/// What an overwrite targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OverwriteType {
    Role,
    Member,
}

impl From<OverwriteType> for u8 {
    fn from(kind: OverwriteType) -> Self {
        match kind {
            OverwriteType::Role => 0,
            OverwriteType::Member => 1,
        }
    }
}

impl TryFrom<u8> for OverwriteType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OverwriteType::Role),
            1 => Ok(OverwriteType::Member),
            other => Err(format!("unknown overwrite type {other}")),
        }
    }
}

/// A channel-scoped allow/deny pair for a role or a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: OverwriteType,
    #[serde(default)]
    pub allow: Permissions,
    #[serde(default)]
    pub deny: Permissions,
}

impl PermissionOverwrite {
    pub fn role(id: Snowflake, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id,
            kind: OverwriteType::Role,
            allow,
            deny,
        }
    }

    pub fn member(id: Snowflake, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id,
            kind: OverwriteType::Member,
            allow,
            deny,
        }
    }
}

/// All overwrites attached to one channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionOverwrites(pub Vec<PermissionOverwrite>);

static NO_OVERWRITES: PermissionOverwrites = PermissionOverwrites(Vec::new());

impl PermissionOverwrites {
    pub fn role(&self, role_id: Snowflake) -> Option<&PermissionOverwrite> {
        self.find(OverwriteType::Role, role_id)
    }

    pub fn member(&self, user_id: Snowflake) -> Option<&PermissionOverwrite> {
        self.find(OverwriteType::Member, user_id)
    }

    fn find(&self, kind: OverwriteType, id: Snowflake) -> Option<&PermissionOverwrite> {
        self.0.iter().find(|o| o.kind == kind && o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionOverwrite> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<PermissionOverwrite>> for PermissionOverwrites {
    fn from(overwrites: Vec<PermissionOverwrite>) -> Self {
        Self(overwrites)
    }
}

// ═══════════════════════════════════════════════════════════════════
// CHANNEL VARIANTS
// ═══════════════════════════════════════════════════════════════════

/// Text and announcement channels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildTextChannel {
    pub id: Snowflake,
    #[serde(default)]
    pub guild_id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permission_overwrites: PermissionOverwrites,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub last_message_id: Option<Snowflake>,
    #[serde(default)]
    pub last_pin_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rate_limit_per_user: u32,
}

/// Voice and stage channels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildVoiceChannel {
    pub id: Snowflake,
    #[serde(default)]
    pub guild_id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permission_overwrites: PermissionOverwrites,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
    #[serde(default)]
    pub bitrate: u32,
    #[serde(default)]
    pub user_limit: u32,
    #[serde(default)]
    pub rtc_region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildCategoryChannel {
    pub id: Snowflake,
    #[serde(default)]
    pub guild_id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permission_overwrites: PermissionOverwrites,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildForumChannel {
    pub id: Snowflake,
    #[serde(default)]
    pub guild_id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permission_overwrites: PermissionOverwrites,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMetadata {
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub auto_archive_duration: u32,
    #[serde(default)]
    pub archive_timestamp: Option<DateTime<Utc>>,
}

/// News, public and private threads.
///
/// Threads carry no overwrites of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildThread {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    #[serde(default)]
    pub guild_id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
    #[serde(default)]
    pub owner_id: Option<Snowflake>,
    #[serde(default)]
    pub last_message_id: Option<Snowflake>,
    #[serde(default)]
    pub last_pin_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub thread_metadata: ThreadMetadata,
}

impl GuildThread {
    pub fn new(id: Snowflake, guild_id: Snowflake, parent_id: Snowflake) -> Self {
        Self {
            id,
            guild_id,
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }
}

impl Default for GuildThread {
    fn default() -> Self {
        Self {
            id: Snowflake::ZERO,
            kind: ChannelType::GuildPublicThread,
            guild_id: Snowflake::ZERO,
            name: String::new(),
            parent_id: None,
            owner_id: None,
            last_message_id: None,
            last_pin_timestamp: None,
            message_count: 0,
            member_count: 0,
            thread_metadata: ThreadMetadata::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmChannel {
    pub id: Snowflake,
    #[serde(default)]
    pub last_message_id: Option<Snowflake>,
    #[serde(default)]
    pub last_pin_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recipients: Vec<User>,
}

/// The closed set of guild channel variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuildChannel {
    Text(GuildTextChannel),
    News(GuildTextChannel),
    Voice(GuildVoiceChannel),
    Stage(GuildVoiceChannel),
    Category(GuildCategoryChannel),
    Thread(GuildThread),
    Forum(GuildForumChannel),
}

impl Default for GuildChannel {
    fn default() -> Self {
        GuildChannel::Text(GuildTextChannel::default())
    }
}

impl GuildChannel {
    pub fn id(&self) -> Snowflake {
        match self {
            GuildChannel::Text(c) | GuildChannel::News(c) => c.id,
            GuildChannel::Voice(c) | GuildChannel::Stage(c) => c.id,
            GuildChannel::Category(c) => c.id,
            GuildChannel::Thread(c) => c.id,
            GuildChannel::Forum(c) => c.id,
        }
    }

    pub fn guild_id(&self) -> Snowflake {
        match self {
            GuildChannel::Text(c) | GuildChannel::News(c) => c.guild_id,
            GuildChannel::Voice(c) | GuildChannel::Stage(c) => c.guild_id,
            GuildChannel::Category(c) => c.guild_id,
            GuildChannel::Thread(c) => c.guild_id,
            GuildChannel::Forum(c) => c.guild_id,
        }
    }

    /// Guild-create payloads omit the guild id on nested channels.
    pub fn set_guild_id(&mut self, guild_id: Snowflake) {
        match self {
            GuildChannel::Text(c) | GuildChannel::News(c) => c.guild_id = guild_id,
            GuildChannel::Voice(c) | GuildChannel::Stage(c) => c.guild_id = guild_id,
            GuildChannel::Category(c) => c.guild_id = guild_id,
            GuildChannel::Thread(c) => c.guild_id = guild_id,
            GuildChannel::Forum(c) => c.guild_id = guild_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            GuildChannel::Text(c) | GuildChannel::News(c) => &c.name,
            GuildChannel::Voice(c) | GuildChannel::Stage(c) => &c.name,
            GuildChannel::Category(c) => &c.name,
            GuildChannel::Thread(c) => &c.name,
            GuildChannel::Forum(c) => &c.name,
        }
    }

    pub fn kind(&self) -> ChannelType {
        match self {
            GuildChannel::Text(_) => ChannelType::GuildText,
            GuildChannel::News(_) => ChannelType::GuildNews,
            GuildChannel::Voice(_) => ChannelType::GuildVoice,
            GuildChannel::Stage(_) => ChannelType::GuildStageVoice,
            GuildChannel::Category(_) => ChannelType::GuildCategory,
            GuildChannel::Thread(c) => c.kind,
            GuildChannel::Forum(_) => ChannelType::GuildForum,
        }
    }

    pub fn parent_id(&self) -> Option<Snowflake> {
        match self {
            GuildChannel::Text(c) | GuildChannel::News(c) => c.parent_id,
            GuildChannel::Voice(c) | GuildChannel::Stage(c) => c.parent_id,
            GuildChannel::Category(_) => None,
            GuildChannel::Thread(c) => c.parent_id,
            GuildChannel::Forum(c) => c.parent_id,
        }
    }

    pub fn permission_overwrites(&self) -> &PermissionOverwrites {
        match self {
            GuildChannel::Text(c) | GuildChannel::News(c) => &c.permission_overwrites,
            GuildChannel::Voice(c) | GuildChannel::Stage(c) => &c.permission_overwrites,
            GuildChannel::Category(c) => &c.permission_overwrites,
            GuildChannel::Thread(_) => &NO_OVERWRITES,
            GuildChannel::Forum(c) => &c.permission_overwrites,
        }
    }

    /// Returns false for variants that cannot hold pins.
    pub fn set_last_pin_timestamp(&mut self, timestamp: Option<DateTime<Utc>>) -> bool {
        match self {
            GuildChannel::Text(c) | GuildChannel::News(c) => c.last_pin_timestamp = timestamp,
            GuildChannel::Thread(c) => c.last_pin_timestamp = timestamp,
            _ => return false,
        }
        true
    }

    pub fn last_pin_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            GuildChannel::Text(c) | GuildChannel::News(c) => c.last_pin_timestamp,
            GuildChannel::Thread(c) => c.last_pin_timestamp,
            _ => None,
        }
    }

    /// Voice and stage channels, which carry voice-state membership.
    pub fn is_audio(&self) -> bool {
        matches!(self, GuildChannel::Voice(_) | GuildChannel::Stage(_))
    }

    fn from_value(value: Value) -> Result<Self, String> {
        let kind = channel_type_of(&value)?;
        Ok(match kind {
            ChannelType::GuildText => GuildChannel::Text(decode(value)?),
            ChannelType::GuildNews => GuildChannel::News(decode(value)?),
            ChannelType::GuildVoice => GuildChannel::Voice(decode(value)?),
            ChannelType::GuildStageVoice => GuildChannel::Stage(decode(value)?),
            ChannelType::GuildCategory => GuildChannel::Category(decode(value)?),
            ChannelType::GuildForum => GuildChannel::Forum(decode(value)?),
            ChannelType::GuildNewsThread
            | ChannelType::GuildPublicThread
            | ChannelType::GuildPrivateThread => GuildChannel::Thread(decode(value)?),
            ChannelType::Dm | ChannelType::GroupDm => {
                return Err(format!("channel type {} is not a guild channel", kind.code()))
            }
        })
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        let mut value = match self {
            GuildChannel::Text(c) | GuildChannel::News(c) => serde_json::to_value(c)?,
            GuildChannel::Voice(c) | GuildChannel::Stage(c) => serde_json::to_value(c)?,
            GuildChannel::Category(c) => serde_json::to_value(c)?,
            GuildChannel::Thread(c) => serde_json::to_value(c)?,
            GuildChannel::Forum(c) => serde_json::to_value(c)?,
        };
        if let Value::Object(map) = &mut value {
            map.insert("type".to_string(), Value::from(self.kind().code()));
        }
        Ok(value)
    }
}

impl<'de> Deserialize<'de> for GuildChannel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        GuildChannel::from_value(value).map_err(de::Error::custom)
    }
}

impl Serialize for GuildChannel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

/// Any channel: a guild channel or a direct-message channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    Guild(GuildChannel),
    Dm(DmChannel),
}

impl Default for Channel {
    fn default() -> Self {
        Channel::Guild(GuildChannel::default())
    }
}

impl Channel {
    pub fn id(&self) -> Snowflake {
        match self {
            Channel::Guild(c) => c.id(),
            Channel::Dm(c) => c.id,
        }
    }

    pub fn guild_id(&self) -> Option<Snowflake> {
        match self {
            Channel::Guild(c) => Some(c.guild_id()),
            Channel::Dm(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for Channel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match channel_type_of(&value).map_err(de::Error::custom)? {
            ChannelType::Dm | ChannelType::GroupDm => {
                decode(value).map(Channel::Dm).map_err(de::Error::custom)
            }
            _ => GuildChannel::from_value(value)
                .map(Channel::Guild)
                .map_err(de::Error::custom),
        }
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Channel::Guild(c) => c.serialize(serializer),
            Channel::Dm(c) => {
                let mut value = serde_json::to_value(c).map_err(ser::Error::custom)?;
                if let Value::Object(map) = &mut value {
                    map.insert("type".to_string(), Value::from(ChannelType::Dm.code()));
                }
                value.serialize(serializer)
            }
        }
    }
}

fn channel_type_of(value: &Value) -> Result<ChannelType, String> {
    let code = value
        .get("type")
        .and_then(Value::as_u64)
        .ok_or_else(|| TypesError::MissingField("type").to_string())?;
    ChannelType::try_from(code).map_err(|e| e.to_string())
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| e.to_string())
}
