//! Permission resolution
//!
//! Effective permissions are recomputed from cached roles, members and
//! channel overwrites on every query. Precedence, strongest first:
//!
//! 1. guild ownership and the administrator bit grant everything
//! 2. an active timeout clamps the result to view and history
//! 3. a member-specific overwrite
//! 4. role overwrites, where an allow from any role beats a deny from any other
//! 5. the everyone-role overwrite
//! 6. role permissions

use chrono::{DateTime, Utc};
use cinder_types::{GuildChannel, Member, PermissionOverwrite, Permissions, Snowflake};
use serde::{Deserialize, Serialize};

use crate::caches::Caches;

/// When a member's communication timeout restricts permissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutClamp {
    /// Any timeout timestamp clamps, even one in the past.
    #[default]
    WheneverSet,
    /// Only a timeout that has not expired yet clamps.
    UntilExpired,
}

impl TimeoutClamp {
    pub fn applies(self, member: &Member, now: DateTime<Utc>) -> bool {
        match self {
            TimeoutClamp::WheneverSet => member.has_timeout(),
            TimeoutClamp::UntilExpired => member.is_timed_out_at(now),
        }
    }
}

/// Folds the overwrite layers of one channel over `base`.
///
/// `roles` must not include the everyone-role overwrite.
pub fn apply_overwrites<'a>(
    base: Permissions,
    everyone: Option<&PermissionOverwrite>,
    roles: impl IntoIterator<Item = &'a PermissionOverwrite>,
    member: Option<&PermissionOverwrite>,
) -> Permissions {
    let (everyone_allow, everyone_deny) = everyone
        .map(|o| (o.allow, o.deny))
        .unwrap_or_default();

    let (role_allow, role_deny) = roles
        .into_iter()
        .fold((Permissions::empty(), Permissions::empty()), |(allow, deny), o| {
            (allow | o.allow, deny | o.deny)
        });

    let mut allow = everyone_allow.difference(role_deny) | role_allow;
    let mut deny = everyone_deny.difference(role_allow) | role_deny;

    if let Some(o) = member {
        allow = allow.difference(o.deny) | o.allow;
        deny = deny.difference(o.allow) | o.deny;
    }

    base.difference(deny) | allow
}

impl Caches {
    /// Guild-level permissions of `member`, evaluated now.
    pub fn member_permissions(&self, guild_id: Snowflake, member: &Member) -> Permissions {
        self.member_permissions_at(guild_id, member, Utc::now())
    }

    pub fn member_permissions_at(
        &self,
        guild_id: Snowflake,
        member: &Member,
        now: DateTime<Utc>,
    ) -> Permissions {
        if self
            .guilds()
            .get(guild_id)
            .is_some_and(|g| g.owner_id == member.user_id())
        {
            return Permissions::ALL;
        }

        let roles = self.roles();
        let mut perms = roles
            .get(guild_id, guild_id)
            .map(|everyone| everyone.permissions)
            .unwrap_or_default();

        for role_id in &member.role_ids {
            if let Some(role) = roles.get(guild_id, *role_id) {
                perms |= role.permissions;
                if perms.is_admin() {
                    return Permissions::ALL;
                }
            }
        }

        if self.timeout_clamp().applies(member, now) {
            perms &= Permissions::TIMEOUT_ALLOWED;
        }
        perms
    }

    /// Channel-level permissions of `member`, evaluated now.
    pub fn member_permissions_in_channel(
        &self,
        channel: &GuildChannel,
        member: &Member,
    ) -> Permissions {
        self.member_permissions_in_channel_at(channel, member, Utc::now())
    }

    pub fn member_permissions_in_channel_at(
        &self,
        channel: &GuildChannel,
        member: &Member,
        now: DateTime<Utc>,
    ) -> Permissions {
        let guild_id = channel.guild_id();
        let base = self.member_permissions_at(guild_id, member, now);
        if base.is_admin() {
            return Permissions::ALL;
        }

        let parent = self.thread_parent(channel);
        let overwrites = parent.as_ref().unwrap_or(channel).permission_overwrites();

        let role_overwrites = member
            .role_ids
            .iter()
            .filter(|id| **id != guild_id)
            .filter_map(|id| overwrites.role(*id));

        let mut perms = apply_overwrites(
            base,
            overwrites.role(guild_id),
            role_overwrites,
            overwrites.member(member.user_id()),
        );

        if self.timeout_clamp().applies(member, now) {
            perms &= Permissions::TIMEOUT_ALLOWED;
        }
        perms
    }

    /// Threads carry no overwrites and resolve against their cached parent.
    fn thread_parent(&self, channel: &GuildChannel) -> Option<GuildChannel> {
        match channel {
            GuildChannel::Thread(thread) => thread
                .parent_id
                .and_then(|parent_id| self.channels().get(parent_id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheConfig, CacheFlags};
    use chrono::Duration;
    use cinder_types::{Guild, GuildTextChannel, GuildThread, Role, User};

    const GUILD: Snowflake = Snowflake::new(1);
    const OWNER: Snowflake = Snowflake::new(99);
    const CHANNEL: Snowflake = Snowflake::new(20);
    const MOD_ROLE: Snowflake = Snowflake::new(10);

    fn caches(clamp: TimeoutClamp) -> Caches {
        let caches = Caches::new(
            CacheConfig::new()
                .with_flags(CacheFlags::ALL)
                .with_timeout_clamp(clamp),
        );
        caches.guilds().put(Guild::new(GUILD, "den", OWNER));
        caches.roles().put(
            GUILD,
            GUILD,
            Role::new(GUILD, GUILD, Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES),
        );
        caches
    }

    fn member(user: u64, roles: &[Snowflake]) -> Member {
        Member::new(User::new(Snowflake::new(user), "m"), GUILD, roles.to_vec())
    }

    fn text_channel(overwrites: Vec<PermissionOverwrite>) -> GuildChannel {
        GuildChannel::Text(GuildTextChannel {
            id: CHANNEL,
            guild_id: GUILD,
            permission_overwrites: overwrites.into(),
            ..GuildTextChannel::default()
        })
    }

    #[test]
    fn owner_gets_everything_without_roles() {
        let caches = caches(TimeoutClamp::WheneverSet);
        let owner = member(OWNER.get(), &[]);
        assert_eq!(caches.member_permissions(GUILD, &owner), Permissions::ALL);
    }

    #[test]
    fn everyone_role_is_the_baseline() {
        let caches = caches(TimeoutClamp::WheneverSet);
        assert_eq!(
            caches.member_permissions(GUILD, &member(5, &[])),
            Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES
        );
    }

    #[test]
    fn uncached_roles_contribute_nothing() {
        let caches = caches(TimeoutClamp::WheneverSet);
        let perms = caches.member_permissions(GUILD, &member(5, &[Snowflake::new(404)]));
        assert!(!perms.is_admin());
    }

    #[test]
    fn administrator_bypasses_channel_denies() {
        let caches = caches(TimeoutClamp::WheneverSet);
        caches
            .roles()
            .put(GUILD, MOD_ROLE, Role::new(MOD_ROLE, GUILD, Permissions::ADMINISTRATOR));
        let channel = text_channel(vec![PermissionOverwrite::member(
            Snowflake::new(5),
            Permissions::empty(),
            Permissions::ALL,
        )]);

        let m = member(5, &[MOD_ROLE]);
        assert_eq!(caches.member_permissions_in_channel(&channel, &m), Permissions::ALL);
    }

    #[test]
    fn role_allow_beats_everyone_deny() {
        let caches = caches(TimeoutClamp::WheneverSet);
        caches
            .roles()
            .put(GUILD, MOD_ROLE, Role::new(MOD_ROLE, GUILD, Permissions::empty()));
        let channel = text_channel(vec![
            PermissionOverwrite::role(GUILD, Permissions::empty(), Permissions::SEND_MESSAGES),
            PermissionOverwrite::role(MOD_ROLE, Permissions::SEND_MESSAGES, Permissions::empty()),
        ]);

        let with_role = member(5, &[MOD_ROLE]);
        let without = member(6, &[]);
        assert!(caches
            .member_permissions_in_channel(&channel, &with_role)
            .contains(Permissions::SEND_MESSAGES));
        assert!(!caches
            .member_permissions_in_channel(&channel, &without)
            .contains(Permissions::SEND_MESSAGES));
    }

    #[test]
    fn member_overwrite_beats_role_allow() {
        let caches = caches(TimeoutClamp::WheneverSet);
        let channel = text_channel(vec![
            PermissionOverwrite::role(GUILD, Permissions::empty(), Permissions::SEND_MESSAGES),
            PermissionOverwrite::role(MOD_ROLE, Permissions::SEND_MESSAGES, Permissions::empty()),
            PermissionOverwrite::member(Snowflake::new(5), Permissions::empty(), Permissions::SEND_MESSAGES),
        ]);

        let perms = caches.member_permissions_in_channel(&channel, &member(5, &[MOD_ROLE]));
        assert!(!perms.contains(Permissions::SEND_MESSAGES));
        assert!(perms.contains(Permissions::VIEW_CHANNEL));
    }

    #[test]
    fn multi_bit_denies_use_true_complement() {
        let base = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS;
        let everyone = PermissionOverwrite::role(
            GUILD,
            Permissions::empty(),
            Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS,
        );
        let perms = apply_overwrites(base, Some(&everyone), Vec::<&PermissionOverwrite>::new(), None);
        assert_eq!(perms, Permissions::VIEW_CHANNEL);
    }

    #[test]
    fn stale_timeout_clamps_when_set() {
        let caches = caches(TimeoutClamp::WheneverSet);
        let mut m = member(5, &[]);
        m.communication_disabled_until = Some(Utc::now() - Duration::days(1));

        let perms = caches.member_permissions(GUILD, &m);
        assert_eq!(perms, Permissions::VIEW_CHANNEL);
    }

    #[test]
    fn stale_timeout_is_ignored_until_expired_mode() {
        let caches = caches(TimeoutClamp::UntilExpired);
        let mut m = member(5, &[]);
        m.communication_disabled_until = Some(Utc::now() - Duration::days(1));
        assert!(caches
            .member_permissions(GUILD, &m)
            .contains(Permissions::SEND_MESSAGES));

        m.communication_disabled_until = Some(Utc::now() + Duration::days(1));
        assert!(!caches
            .member_permissions(GUILD, &m)
            .contains(Permissions::SEND_MESSAGES));
    }

    #[test]
    fn timeout_clamps_after_channel_allows() {
        let caches = caches(TimeoutClamp::WheneverSet);
        let channel = text_channel(vec![PermissionOverwrite::member(
            Snowflake::new(5),
            Permissions::MANAGE_MESSAGES | Permissions::READ_MESSAGE_HISTORY,
            Permissions::empty(),
        )]);
        let mut m = member(5, &[]);
        m.communication_disabled_until = Some(Utc::now() + Duration::hours(1));

        let perms = caches.member_permissions_in_channel(&channel, &m);
        assert_eq!(perms, Permissions::VIEW_CHANNEL | Permissions::READ_MESSAGE_HISTORY);
    }

    #[test]
    fn threads_resolve_against_parent_overwrites() {
        let caches = caches(TimeoutClamp::WheneverSet);
        caches.channels().put(text_channel(vec![PermissionOverwrite::role(
            GUILD,
            Permissions::empty(),
            Permissions::SEND_MESSAGES,
        )]));
        let thread = GuildChannel::Thread(GuildThread::new(Snowflake::new(21), GUILD, CHANNEL));

        let perms = caches.member_permissions_in_channel(&thread, &member(5, &[]));
        assert!(!perms.contains(Permissions::SEND_MESSAGES));
    }
}
