//! The cache aggregate and its cross-cutting queries

use cinder_types::{
    Emoji, GuildChannel, GuildScheduledEvent, Member, Message, Presence, Role, SelfUser, Snowflake,
    StageInstance, Sticker, ThreadMember, VoiceState,
};
use std::sync::Arc;

use crate::channel::ChannelCache;
use crate::config::CacheConfig;
use crate::flags::CacheFlags;
use crate::grouped::GroupedCache;
use crate::guild::GuildCache;
use crate::permissions::TimeoutClamp;
use crate::self_identity::SelfIdentity;

/// Every store, plus the local actor's identity.
///
/// Grouping per kind:
///
/// | Store | Group | Key |
/// |-------|-------|-----|
/// | roles, members, presences, voice states, emojis, stickers, stage instances, scheduled events | guild | entity / user |
/// | messages | channel | message |
/// | thread members | thread | user |
pub struct Caches {
    config: CacheConfig,
    identity: Arc<SelfIdentity>,
    guilds: GuildCache,
    channels: ChannelCache,
    roles: GroupedCache<Role>,
    members: GroupedCache<Member>,
    thread_members: GroupedCache<ThreadMember>,
    presences: GroupedCache<Presence>,
    voice_states: GroupedCache<VoiceState>,
    messages: GroupedCache<Message>,
    emojis: GroupedCache<Emoji>,
    stickers: GroupedCache<Sticker>,
    stage_instances: GroupedCache<StageInstance>,
    scheduled_events: GroupedCache<GuildScheduledEvent>,
}

impl Caches {
    pub fn new(config: CacheConfig) -> Self {
        let flags = config.flags;
        let identity = Arc::new(SelfIdentity::new());

        Self {
            guilds: GuildCache::new(flags),
            channels: ChannelCache::new(flags),
            roles: GroupedCache::new(flags, CacheFlags::ROLES, None, Arc::clone(&identity)),
            members: GroupedCache::new(
                flags,
                CacheFlags::MEMBERS,
                config.member_policy.clone(),
                Arc::clone(&identity),
            ),
            thread_members: GroupedCache::new(
                flags,
                CacheFlags::THREAD_MEMBERS,
                None,
                Arc::clone(&identity),
            ),
            presences: GroupedCache::new(flags, CacheFlags::PRESENCES, None, Arc::clone(&identity)),
            voice_states: GroupedCache::new(
                flags,
                CacheFlags::VOICE_STATES,
                None,
                Arc::clone(&identity),
            ),
            messages: GroupedCache::new(
                flags,
                CacheFlags::MESSAGES,
                config.message_policy.clone(),
                Arc::clone(&identity),
            ),
            emojis: GroupedCache::new(flags, CacheFlags::EMOJIS, None, Arc::clone(&identity)),
            stickers: GroupedCache::new(flags, CacheFlags::STICKERS, None, Arc::clone(&identity)),
            stage_instances: GroupedCache::new(
                flags,
                CacheFlags::STAGE_INSTANCES,
                None,
                Arc::clone(&identity),
            ),
            scheduled_events: GroupedCache::new(
                flags,
                CacheFlags::GUILD_SCHEDULED_EVENTS,
                None,
                Arc::clone(&identity),
            ),
            identity,
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn cache_flags(&self) -> CacheFlags {
        self.config.flags
    }

    pub fn timeout_clamp(&self) -> TimeoutClamp {
        self.config.timeout_clamp
    }

    pub fn identity(&self) -> &Arc<SelfIdentity> {
        &self.identity
    }

    pub fn guilds(&self) -> &GuildCache {
        &self.guilds
    }

    pub fn channels(&self) -> &ChannelCache {
        &self.channels
    }

    pub fn roles(&self) -> &GroupedCache<Role> {
        &self.roles
    }

    pub fn members(&self) -> &GroupedCache<Member> {
        &self.members
    }

    pub fn thread_members(&self) -> &GroupedCache<ThreadMember> {
        &self.thread_members
    }

    pub fn presences(&self) -> &GroupedCache<Presence> {
        &self.presences
    }

    pub fn voice_states(&self) -> &GroupedCache<VoiceState> {
        &self.voice_states
    }

    pub fn messages(&self) -> &GroupedCache<Message> {
        &self.messages
    }

    pub fn emojis(&self) -> &GroupedCache<Emoji> {
        &self.emojis
    }

    pub fn stickers(&self) -> &GroupedCache<Sticker> {
        &self.stickers
    }

    pub fn stage_instances(&self) -> &GroupedCache<StageInstance> {
        &self.stage_instances
    }

    pub fn scheduled_events(&self) -> &GroupedCache<GuildScheduledEvent> {
        &self.scheduled_events
    }

    // ═══════════════════════════════════════════════════════════════════
    // CROSS-CUTTING QUERIES
    // ═══════════════════════════════════════════════════════════════════

    pub fn self_user(&self) -> Option<SelfUser> {
        self.identity.get()
    }

    pub fn put_self_user(&self, user: SelfUser) {
        self.identity.set(user);
    }

    /// The local actor's membership in `guild_id`.
    pub fn self_member(&self, guild_id: Snowflake) -> Option<Member> {
        let self_id = self.identity.id()?;
        self.members.get(guild_id, self_id)
    }

    /// Cached roles referenced by `member`, highest position first.
    pub fn member_roles(&self, member: &Member) -> Vec<Role> {
        let mut roles = self
            .roles
            .find_all(|group, role| group == member.guild_id && member.has_role(role.id));
        roles.sort_by(|a, b| b.position.cmp(&a.position).then(a.id.cmp(&b.id)));
        roles
    }

    /// Cached members currently connected to an audio channel.
    pub fn audio_channel_members(&self, channel: &GuildChannel) -> Vec<Member> {
        if !channel.is_audio() {
            return Vec::new();
        }
        let guild_id = channel.guild_id();
        let mut user_ids = Vec::new();
        self.voice_states.for_each_group(guild_id, |state| {
            if state.channel_id == Some(channel.id()) {
                user_ids.push(state.user_id);
            }
        });
        user_ids
            .into_iter()
            .filter_map(|user_id| self.members.get(guild_id, user_id))
            .collect()
    }

    /// Drops a guild and everything cached under it.
    pub fn remove_guild_data(&self, guild_id: Snowflake) {
        for channel_id in self.channels.remove_guild(guild_id) {
            self.messages.remove_group(channel_id);
            self.thread_members.remove_group(channel_id);
        }
        // messages of uncached channels
        self.messages
            .remove_if(|_, message| message.guild_id == Some(guild_id));

        self.roles.remove_group(guild_id);
        self.members.remove_group(guild_id);
        self.presences.remove_group(guild_id);
        self.voice_states.remove_group(guild_id);
        self.emojis.remove_group(guild_id);
        self.stickers.remove_group(guild_id);
        self.stage_instances.remove_group(guild_id);
        self.scheduled_events.remove_group(guild_id);
        self.guilds.remove(guild_id);

        tracing::debug!(guild_id = %guild_id, "Removed cached guild data");
    }
}

impl Default for Caches {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use cinder_types::{GuildTextChannel, GuildVoiceChannel, Permissions, User};

    const GUILD: Snowflake = Snowflake::new(1);

    fn self_user(id: u64) -> SelfUser {
        SelfUser {
            user: User::new(Snowflake::new(id), "me"),
            ..SelfUser::default()
        }
    }

    fn member(user: u64, roles: &[u64]) -> Member {
        Member::new(
            User::new(Snowflake::new(user), "m"),
            GUILD,
            roles.iter().copied().map(Snowflake::new).collect(),
        )
    }

    #[test]
    fn member_roles_sorted_by_position() {
        let caches = Caches::new(CacheConfig::new().with_flags(CacheFlags::ALL));
        for (id, position) in [(10, 1), (11, 5), (12, 3)] {
            let mut role = Role::new(Snowflake::new(id), GUILD, Permissions::empty());
            role.position = position;
            caches.roles().put(GUILD, role.id, role);
        }

        let ids: Vec<u64> = caches
            .member_roles(&member(5, &[10, 11]))
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(ids, vec![11, 10]);
    }

    #[test]
    fn audio_members_follow_voice_states() {
        let caches = Caches::new(CacheConfig::new().with_flags(CacheFlags::ALL));
        let lounge = GuildChannel::Voice(GuildVoiceChannel {
            id: Snowflake::new(20),
            guild_id: GUILD,
            ..GuildVoiceChannel::default()
        });

        for user in [5, 6] {
            caches.members().put(GUILD, Snowflake::new(user), member(user, &[]));
        }
        caches.voice_states().put(
            GUILD,
            Snowflake::new(5),
            VoiceState {
                guild_id: Some(GUILD),
                channel_id: Some(Snowflake::new(20)),
                user_id: Snowflake::new(5),
                ..VoiceState::default()
            },
        );

        let members = caches.audio_channel_members(&lounge);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id(), Snowflake::new(5));

        let text = GuildChannel::Text(GuildTextChannel::default());
        assert!(caches.audio_channel_members(&text).is_empty());
    }

    #[test]
    fn self_member_needs_identity() {
        let caches = Caches::new(
            CacheConfig::new()
                .with_flags(CacheFlags::ALL)
                .with_member_policy(Policy::self_member()),
        );
        assert!(caches.self_member(GUILD).is_none());

        caches.put_self_user(self_user(5));
        assert!(caches.members().put(GUILD, Snowflake::new(5), member(5, &[])));
        assert!(!caches.members().put(GUILD, Snowflake::new(6), member(6, &[])));
        assert!(caches.self_member(GUILD).is_some());
    }

    #[test]
    fn guild_removal_drops_dependents() {
        let caches = Caches::new(CacheConfig::new().with_flags(CacheFlags::ALL));
        caches.channels().put(GuildChannel::Text(GuildTextChannel {
            id: Snowflake::new(20),
            guild_id: GUILD,
            ..GuildTextChannel::default()
        }));
        caches.roles().put(GUILD, GUILD, Role::new(GUILD, GUILD, Permissions::empty()));
        caches.messages().put(
            Snowflake::new(20),
            Snowflake::new(300),
            Message {
                id: Snowflake::new(300),
                channel_id: Snowflake::new(20),
                guild_id: Some(GUILD),
                ..Message::default()
            },
        );
        caches.roles().put(
            Snowflake::new(2),
            Snowflake::new(2),
            Role::new(Snowflake::new(2), Snowflake::new(2), Permissions::empty()),
        );

        caches.remove_guild_data(GUILD);

        assert!(caches.channels().is_empty());
        assert!(caches.messages().is_empty());
        assert_eq!(caches.roles().len(), 1);
    }
}
