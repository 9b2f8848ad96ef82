//! Retention policies
//!
//! A policy decides whether an upsert that already passed the flag gate is
//! actually kept. Policies compose with [`Policy::and`], [`Policy::or`] and
//! `!policy`.

use chrono::{Duration, Utc};
use cinder_types::{Member, Message, Snowflake};
use std::collections::HashSet;
use std::fmt;
use std::ops::Not;
use std::sync::Arc;

/// What a policy can see besides the entity itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyContext {
    /// Group the entity is being stored under.
    pub group_id: Snowflake,
    /// The local actor, once known.
    pub self_user_id: Option<Snowflake>,
}

type Predicate<T> = dyn Fn(&T, &PolicyContext) -> bool + Send + Sync;

/// Predicate over `(entity, context)` deciding retention
pub struct Policy<T> {
    predicate: Arc<Predicate<T>>,
}

impl<T> Clone for Policy<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Policy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy").finish_non_exhaustive()
    }
}

impl<T: 'static> Policy<T> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T, &PolicyContext) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    pub fn all() -> Self {
        Self::new(|_, _| true)
    }

    pub fn none() -> Self {
        Self::new(|_, _| false)
    }

    pub fn allows(&self, entity: &T, ctx: &PolicyContext) -> bool {
        (self.predicate)(entity, ctx)
    }

    pub fn and(self, other: Policy<T>) -> Self {
        Self::new(move |e, ctx| self.allows(e, ctx) && other.allows(e, ctx))
    }

    pub fn or(self, other: Policy<T>) -> Self {
        Self::new(move |e, ctx| self.allows(e, ctx) || other.allows(e, ctx))
    }
}

impl<T: 'static> Not for Policy<T> {
    type Output = Policy<T>;

    fn not(self) -> Self::Output {
        Policy::new(move |e, ctx| !self.allows(e, ctx))
    }
}

// ═══════════════════════════════════════════════════════════════════
// PRESETS
// ═══════════════════════════════════════════════════════════════════

impl Policy<Member> {
    /// Only the local actor's own membership.
    pub fn self_member() -> Self {
        Self::new(|m: &Member, ctx| ctx.self_user_id == Some(m.user_id()))
    }

    /// Members that have not passed membership screening.
    pub fn pending() -> Self {
        Self::new(|m: &Member, _| m.pending)
    }

    pub fn with_any_role(role_ids: impl IntoIterator<Item = Snowflake>) -> Self {
        let role_ids: HashSet<Snowflake> = role_ids.into_iter().collect();
        Self::new(move |m: &Member, _| m.role_ids.iter().any(|id| role_ids.contains(id)))
    }
}

impl Policy<Message> {
    pub fn authored_by_self() -> Self {
        Self::new(|m: &Message, ctx| ctx.self_user_id == Some(m.author.id))
    }

    pub fn in_channels(channel_ids: impl IntoIterator<Item = Snowflake>) -> Self {
        let channel_ids: HashSet<Snowflake> = channel_ids.into_iter().collect();
        Self::new(move |m: &Message, _| channel_ids.contains(&m.channel_id))
    }

    pub fn in_guilds(guild_ids: impl IntoIterator<Item = Snowflake>) -> Self {
        let guild_ids: HashSet<Snowflake> = guild_ids.into_iter().collect();
        Self::new(move |m: &Message, _| m.guild_id.is_some_and(|id| guild_ids.contains(&id)))
    }

    /// Messages created less than `age` ago, judged at upsert time.
    pub fn newer_than(age: Duration) -> Self {
        Self::new(move |m: &Message, _| m.timestamp > Utc::now() - age)
    }
}
