//! Cache configuration

use cinder_types::{Member, Message};

use crate::flags::CacheFlags;
use crate::permissions::TimeoutClamp;
use crate::policy::Policy;

/// Settings fixed when the [`Caches`](crate::Caches) aggregate is built
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    pub flags: CacheFlags,
    pub timeout_clamp: TimeoutClamp,
    pub member_policy: Option<Policy<Member>>,
    pub message_policy: Option<Policy<Message>>,
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(mut self, flags: CacheFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_timeout_clamp(mut self, clamp: TimeoutClamp) -> Self {
        self.timeout_clamp = clamp;
        self
    }

    pub fn with_member_policy(mut self, policy: Policy<Member>) -> Self {
        self.member_policy = Some(policy);
        self
    }

    pub fn with_message_policy(mut self, policy: Policy<Message>) -> Self {
        self.message_policy = Some(policy);
        self
    }
}
