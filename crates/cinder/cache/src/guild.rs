//! Guild store with availability tracking

use cinder_types::{Guild, Snowflake};
use dashmap::{DashMap, DashSet};

use crate::flags::CacheFlags;

/// Guilds keyed by id.
///
/// Besides the guilds themselves, the store remembers which guilds the
/// gateway announced but has not delivered yet (unready) and which went down
/// after being delivered (unavailable). That bookkeeping is kept even when
/// [`CacheFlags::GUILDS`] is off, since GUILD_CREATE classification needs it.
#[derive(Debug)]
pub struct GuildCache {
    enabled: bool,
    guilds: DashMap<Snowflake, Guild>,
    unready: DashSet<Snowflake>,
    unavailable: DashSet<Snowflake>,
}

impl GuildCache {
    pub fn new(flags: CacheFlags) -> Self {
        Self {
            enabled: flags.contains(CacheFlags::GUILDS),
            guilds: DashMap::new(),
            unready: DashSet::new(),
            unavailable: DashSet::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, id: Snowflake) -> Option<Guild> {
        if !self.enabled {
            return None;
        }
        self.guilds.get(&id).map(|g| g.clone())
    }

    pub fn put(&self, guild: Guild) -> bool {
        if !self.enabled {
            return false;
        }
        self.guilds.insert(guild.id, guild);
        true
    }

    pub fn remove(&self, id: Snowflake) -> Option<Guild> {
        self.guilds.remove(&id).map(|(_, g)| g)
    }

    pub fn all(&self) -> Vec<Guild> {
        self.find_all(|_| true)
    }

    pub fn find_all<F>(&self, mut predicate: F) -> Vec<Guild>
    where
        F: FnMut(&Guild) -> bool,
    {
        if !self.enabled {
            return Vec::new();
        }
        self.guilds
            .iter()
            .filter(|g| predicate(g.value()))
            .map(|g| g.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        if self.enabled {
            self.guilds.len()
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_unready(&self, id: Snowflake, unready: bool) {
        if unready {
            self.unready.insert(id);
        } else {
            self.unready.remove(&id);
        }
    }

    pub fn is_unready(&self, id: Snowflake) -> bool {
        self.unready.contains(&id)
    }

    pub fn unready_ids(&self) -> Vec<Snowflake> {
        self.unready.iter().map(|id| *id).collect()
    }

    pub fn set_unavailable(&self, id: Snowflake, unavailable: bool) {
        if unavailable {
            self.unavailable.insert(id);
        } else {
            self.unavailable.remove(&id);
        }
    }

    pub fn is_unavailable(&self, id: Snowflake) -> bool {
        self.unavailable.contains(&id)
    }

    pub fn unavailable_ids(&self) -> Vec<Snowflake> {
        self.unavailable.iter().map(|id| *id).collect()
    }
}
