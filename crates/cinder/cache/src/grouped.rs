//! Grouped key-value store

use cinder_types::Snowflake;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::flags::CacheFlags;
use crate::policy::{Policy, PolicyContext};
use crate::self_identity::SelfIdentity;

/// Store for one entity kind keyed by `(group, id)`.
///
/// Writes are ignored while the kind's flag is disabled, and reads return
/// nothing. A retention policy, when set, may reject an upsert; rejecting an
/// upsert for a key already present evicts that key.
///
/// Iteration callbacks run under the store's read lock and must not write to
/// the same store.
pub struct GroupedCache<T> {
    flag: CacheFlags,
    enabled: bool,
    policy: Option<Policy<T>>,
    identity: Arc<SelfIdentity>,
    groups: RwLock<HashMap<Snowflake, HashMap<Snowflake, T>>>,
}

impl<T: Clone + 'static> GroupedCache<T> {
    pub fn new(
        flags: CacheFlags,
        flag: CacheFlags,
        policy: Option<Policy<T>>,
        identity: Arc<SelfIdentity>,
    ) -> Self {
        Self {
            flag,
            enabled: flags.intersects(flag),
            policy,
            identity,
            groups: RwLock::new(HashMap::new()),
        }
    }

    pub fn flag(&self) -> CacheFlags {
        self.flag
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, group_id: Snowflake, id: Snowflake) -> Option<T> {
        if !self.enabled {
            return None;
        }
        self.groups
            .read()
            .get(&group_id)
            .and_then(|group| group.get(&id))
            .cloned()
    }

    pub fn contains(&self, group_id: Snowflake, id: Snowflake) -> bool {
        self.enabled
            && self
                .groups
                .read()
                .get(&group_id)
                .is_some_and(|group| group.contains_key(&id))
    }

    /// Stores `value` if the flag is enabled and the policy accepts it.
    ///
    /// Returns whether the value was stored.
    pub fn put(&self, group_id: Snowflake, id: Snowflake, value: T) -> bool {
        if !self.enabled {
            return false;
        }

        if let Some(policy) = &self.policy {
            let ctx = PolicyContext {
                group_id,
                self_user_id: self.identity.id(),
            };
            if !policy.allows(&value, &ctx) {
                if self.remove(group_id, id).is_some() {
                    tracing::trace!(
                        flag = ?self.flag,
                        group_id = %group_id,
                        id = %id,
                        "Evicted entry rejected by retention policy"
                    );
                }
                return false;
            }
        }

        self.groups
            .write()
            .entry(group_id)
            .or_default()
            .insert(id, value);
        true
    }

    pub fn remove(&self, group_id: Snowflake, id: Snowflake) -> Option<T> {
        let mut groups = self.groups.write();
        let group = groups.get_mut(&group_id)?;
        let removed = group.remove(&id);
        if group.is_empty() {
            groups.remove(&group_id);
        }
        removed
    }

    /// Drops a whole group, returning how many entries it held.
    pub fn remove_group(&self, group_id: Snowflake) -> usize {
        self.groups
            .write()
            .remove(&group_id)
            .map(|group| group.len())
            .unwrap_or(0)
    }

    /// Drops every entry matching `predicate`, returning how many were dropped.
    pub fn remove_if<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(Snowflake, &T) -> bool,
    {
        let mut groups = self.groups.write();
        let mut removed = 0;
        groups.retain(|group_id, group| {
            let before = group.len();
            group.retain(|_, value| !predicate(*group_id, value));
            removed += before - group.len();
            !group.is_empty()
        });
        removed
    }

    pub fn for_each_group<F>(&self, group_id: Snowflake, mut f: F)
    where
        F: FnMut(&T),
    {
        if !self.enabled {
            return;
        }
        if let Some(group) = self.groups.read().get(&group_id) {
            group.values().for_each(|value| f(value));
        }
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Snowflake, &T),
    {
        if !self.enabled {
            return;
        }
        for (group_id, group) in self.groups.read().iter() {
            group.values().for_each(|value| f(*group_id, value));
        }
    }

    /// Linear scan over every group.
    pub fn find_all<F>(&self, mut predicate: F) -> Vec<T>
    where
        F: FnMut(Snowflake, &T) -> bool,
    {
        let mut found = Vec::new();
        self.for_each(|group_id, value| {
            if predicate(group_id, value) {
                found.push(value.clone());
            }
        });
        found
    }

    pub fn find_first<F>(&self, mut predicate: F) -> Option<T>
    where
        F: FnMut(Snowflake, &T) -> bool,
    {
        if !self.enabled {
            return None;
        }
        self.groups.read().iter().find_map(|(group_id, group)| {
            group
                .values()
                .find(|value| predicate(*group_id, value))
                .cloned()
        })
    }

    pub fn group_all(&self, group_id: Snowflake) -> Vec<T> {
        let mut values = Vec::new();
        self.for_each_group(group_id, |value| values.push(value.clone()));
        values
    }

    pub fn all(&self) -> Vec<T> {
        self.find_all(|_, _| true)
    }

    pub fn len(&self) -> usize {
        if !self.enabled {
            return 0;
        }
        self.groups.read().values().map(HashMap::len).sum()
    }

    pub fn group_len(&self, group_id: Snowflake) -> usize {
        if !self.enabled {
            return 0;
        }
        self.groups.read().get(&group_id).map(HashMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
