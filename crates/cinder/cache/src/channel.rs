//! Guild channel store

use cinder_types::{GuildChannel, Snowflake};
use dashmap::DashMap;

use crate::flags::CacheFlags;

/// Guild channels and threads keyed by channel id.
///
/// Channel ids are unique across guilds, so the owning guild is carried on
/// the value rather than in the key. Each variant is gated by its own
/// sub-bit of [`CacheFlags::ALL_CHANNELS`].
#[derive(Debug)]
pub struct ChannelCache {
    flags: CacheFlags,
    channels: DashMap<Snowflake, GuildChannel>,
}

impl ChannelCache {
    pub fn new(flags: CacheFlags) -> Self {
        Self {
            flags: flags & CacheFlags::ALL_CHANNELS,
            channels: DashMap::new(),
        }
    }

    fn admits(&self, channel: &GuildChannel) -> bool {
        self.flags.contains(CacheFlags::for_channel(channel))
    }

    pub fn get(&self, id: Snowflake) -> Option<GuildChannel> {
        self.channels
            .get(&id)
            .filter(|c| self.admits(c.value()))
            .map(|c| c.value().clone())
    }

    /// Looks a channel up and checks that it belongs to `guild_id`.
    pub fn get_in(&self, guild_id: Snowflake, id: Snowflake) -> Option<GuildChannel> {
        self.get(id).filter(|c| c.guild_id() == guild_id)
    }

    /// Stores `channel`. A variant whose sub-bit is disabled is not stored
    /// and evicts any entry previously cached under the same id.
    pub fn put(&self, channel: GuildChannel) -> bool {
        if !self.admits(&channel) {
            self.channels.remove(&channel.id());
            return false;
        }
        self.channels.insert(channel.id(), channel);
        true
    }

    pub fn remove(&self, id: Snowflake) -> Option<GuildChannel> {
        self.channels.remove(&id).map(|(_, c)| c)
    }

    /// Applies `f` to a cached channel in place.
    pub fn update<F>(&self, id: Snowflake, f: F) -> bool
    where
        F: FnOnce(&mut GuildChannel),
    {
        match self.channels.get_mut(&id) {
            Some(mut entry) => {
                f(entry.value_mut());
                true
            }
            None => false,
        }
    }

    pub fn find_all<F>(&self, mut predicate: F) -> Vec<GuildChannel>
    where
        F: FnMut(&GuildChannel) -> bool,
    {
        self.channels
            .iter()
            .filter(|c| self.admits(c.value()) && predicate(c.value()))
            .map(|c| c.value().clone())
            .collect()
    }

    pub fn guild_channels(&self, guild_id: Snowflake) -> Vec<GuildChannel> {
        self.find_all(|c| c.guild_id() == guild_id)
    }

    pub fn guild_threads(&self, guild_id: Snowflake) -> Vec<GuildChannel> {
        self.find_all(|c| c.guild_id() == guild_id && matches!(c, GuildChannel::Thread(_)))
    }

    /// Drops every channel of a guild, returning the dropped ids.
    pub fn remove_guild(&self, guild_id: Snowflake) -> Vec<Snowflake> {
        let ids: Vec<Snowflake> = self
            .channels
            .iter()
            .filter(|c| c.guild_id() == guild_id)
            .map(|c| *c.key())
            .collect();
        for id in &ids {
            self.channels.remove(id);
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.channels.iter().filter(|c| self.admits(c.value())).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
