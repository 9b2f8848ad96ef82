//! Cache flags

use bitflags::bitflags;
use cinder_types::GuildChannel;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which entity kinds are mirrored locally.
    ///
    /// A kind whose bit is unset is never stored and never returned, even if
    /// a handler tries to write it. Guild channels have one bit per variant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CacheFlags: u32 {
        const GUILDS                 = 1 << 0;
        const TEXT_CHANNELS          = 1 << 1;
        const VOICE_CHANNELS         = 1 << 2;
        const CATEGORIES             = 1 << 3;
        const NEWS_CHANNELS          = 1 << 4;
        const THREADS                = 1 << 5;
        const STAGE_CHANNELS         = 1 << 6;
        const FORUM_CHANNELS         = 1 << 7;
        const ROLES                  = 1 << 8;
        const MEMBERS                = 1 << 9;
        const THREAD_MEMBERS         = 1 << 10;
        const PRESENCES              = 1 << 11;
        const VOICE_STATES           = 1 << 12;
        const MESSAGES               = 1 << 13;
        const EMOJIS                 = 1 << 14;
        const STICKERS               = 1 << 15;
        const STAGE_INSTANCES        = 1 << 16;
        const GUILD_SCHEDULED_EVENTS = 1 << 17;
    }
}

impl CacheFlags {
    pub const NONE: Self = Self::empty();

    pub const ALL_CHANNELS: Self = Self::TEXT_CHANNELS
        .union(Self::VOICE_CHANNELS)
        .union(Self::CATEGORIES)
        .union(Self::NEWS_CHANNELS)
        .union(Self::THREADS)
        .union(Self::STAGE_CHANNELS)
        .union(Self::FORUM_CHANNELS);

    /// Guilds, channels, roles, emojis, stickers and voice states.
    pub const DEFAULT: Self = Self::GUILDS
        .union(Self::ALL_CHANNELS)
        .union(Self::ROLES)
        .union(Self::EMOJIS)
        .union(Self::STICKERS)
        .union(Self::VOICE_STATES);

    pub const ALL: Self = Self::all();

    /// The sub-bit gating one channel variant.
    pub fn for_channel(channel: &GuildChannel) -> Self {
        match channel {
            GuildChannel::Text(_) => Self::TEXT_CHANNELS,
            GuildChannel::News(_) => Self::NEWS_CHANNELS,
            GuildChannel::Voice(_) => Self::VOICE_CHANNELS,
            GuildChannel::Stage(_) => Self::STAGE_CHANNELS,
            GuildChannel::Category(_) => Self::CATEGORIES,
            GuildChannel::Thread(_) => Self::THREADS,
            GuildChannel::Forum(_) => Self::FORUM_CHANNELS,
        }
    }
}

impl Default for CacheFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_types::{GuildThread, GuildVoiceChannel};

    #[test]
    fn default_keeps_channels_but_not_members() {
        assert!(CacheFlags::DEFAULT.contains(CacheFlags::ALL_CHANNELS));
        assert!(!CacheFlags::DEFAULT.contains(CacheFlags::MEMBERS));
        assert!(!CacheFlags::DEFAULT.contains(CacheFlags::MESSAGES));
    }

    #[test]
    fn channel_variants_map_to_sub_bits() {
        let stage = GuildChannel::Stage(GuildVoiceChannel::default());
        let thread = GuildChannel::Thread(GuildThread::default());
        assert_eq!(CacheFlags::for_channel(&stage), CacheFlags::STAGE_CHANNELS);
        assert_eq!(CacheFlags::for_channel(&thread), CacheFlags::THREADS);
    }

    #[test]
    fn flags_read_from_names() {
        let flags: CacheFlags = serde_json::from_str("\"GUILDS | MEMBERS\"").unwrap();
        assert_eq!(flags, CacheFlags::GUILDS | CacheFlags::MEMBERS);
    }
}
