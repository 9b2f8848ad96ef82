//! Permission bitmask
//!
//! Rights are a fixed, platform-defined set of bits. The wire form is the
//! decimal string of the raw integer. Unknown bits are dropped on decode so
//! that complement and difference stay scoped to the rights defined here.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Rights a member may hold in a guild or channel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        const CREATE_INSTANT_INVITE      = 1 << 0;
        const KICK_MEMBERS               = 1 << 1;
        const BAN_MEMBERS                = 1 << 2;
        /// Implies every other right and bypasses channel overwrites.
        const ADMINISTRATOR              = 1 << 3;
        const MANAGE_CHANNELS            = 1 << 4;
        const MANAGE_GUILD               = 1 << 5;
        const ADD_REACTIONS              = 1 << 6;
        const VIEW_AUDIT_LOG             = 1 << 7;
        const PRIORITY_SPEAKER           = 1 << 8;
        const STREAM                     = 1 << 9;
        const VIEW_CHANNEL               = 1 << 10;
        const SEND_MESSAGES              = 1 << 11;
        const SEND_TTS_MESSAGES          = 1 << 12;
        const MANAGE_MESSAGES            = 1 << 13;
        const EMBED_LINKS                = 1 << 14;
        const ATTACH_FILES               = 1 << 15;
        const READ_MESSAGE_HISTORY       = 1 << 16;
        const MENTION_EVERYONE           = 1 << 17;
        const USE_EXTERNAL_EMOJIS        = 1 << 18;
        const VIEW_GUILD_INSIGHTS        = 1 << 19;
        const CONNECT                    = 1 << 20;
        const SPEAK                      = 1 << 21;
        const MUTE_MEMBERS               = 1 << 22;
        const DEAFEN_MEMBERS             = 1 << 23;
        const MOVE_MEMBERS               = 1 << 24;
        const USE_VAD                    = 1 << 25;
        const CHANGE_NICKNAME            = 1 << 26;
        const MANAGE_NICKNAMES           = 1 << 27;
        const MANAGE_ROLES               = 1 << 28;
        const MANAGE_WEBHOOKS            = 1 << 29;
        const MANAGE_EMOJIS_AND_STICKERS = 1 << 30;
        const USE_APPLICATION_COMMANDS   = 1 << 31;
        const REQUEST_TO_SPEAK           = 1 << 32;
        const MANAGE_EVENTS              = 1 << 33;
        const MANAGE_THREADS             = 1 << 34;
        const CREATE_PUBLIC_THREADS      = 1 << 35;
        const CREATE_PRIVATE_THREADS     = 1 << 36;
        const USE_EXTERNAL_STICKERS      = 1 << 37;
        const SEND_MESSAGES_IN_THREADS   = 1 << 38;
        const USE_EMBEDDED_ACTIVITIES    = 1 << 39;
        const MODERATE_MEMBERS           = 1 << 40;
    }
}

impl Permissions {
    /// Every defined right.
    pub const ALL: Self = Self::all();

    /// What a timed-out member keeps.
    pub const TIMEOUT_ALLOWED: Self = Self::VIEW_CHANNEL.union(Self::READ_MESSAGE_HISTORY);

    /// Decode a raw wire integer, dropping bits this model does not define.
    pub const fn from_raw(raw: u64) -> Self {
        Self::from_bits_truncate(raw)
    }

    pub fn is_admin(self) -> bool {
        self.contains(Self::ADMINISTRATOR)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(u64),
        }

        let raw = match Raw::deserialize(deserializer)? {
            Raw::Int(v) => v,
            Raw::Str(s) => s.parse::<u64>().map_err(serde::de::Error::custom)?,
        };
        Ok(Self::from_raw(raw))
    }
}
