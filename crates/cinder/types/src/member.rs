//! Guild members

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::Permissions;
use crate::snowflake::Snowflake;
use crate::user::User;

/// A user's membership in one guild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    /// Filled in by the handler when the wire object omits it.
    #[serde(default)]
    pub guild_id: Snowflake,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, rename = "roles")]
    pub role_ids: Vec<Snowflake>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub communication_disabled_until: Option<DateTime<Utc>>,
}

impl Member {
    pub fn new(user: User, guild_id: Snowflake, role_ids: Vec<Snowflake>) -> Self {
        Self {
            user,
            guild_id,
            role_ids,
            ..Self::default()
        }
    }

    pub fn user_id(&self) -> Snowflake {
        self.user.id
    }

    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Whether a timeout timestamp is present at all, expired or not.
    pub fn has_timeout(&self) -> bool {
        self.communication_disabled_until.is_some()
    }

    /// Whether the timeout is still running at `now`.
    pub fn is_timed_out_at(&self, now: DateTime<Utc>) -> bool {
        self.communication_disabled_until
            .map(|until| until > now)
            .unwrap_or(false)
    }
}

/// A member as delivered inside an interaction, with its computed channel permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMember {
    #[serde(flatten)]
    pub member: Member,
    #[serde(default)]
    pub permissions: Permissions,
}

/// A user's membership in one thread
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMember {
    /// The thread id.
    #[serde(default)]
    pub id: Snowflake,
    #[serde(default)]
    pub user_id: Snowflake,
    #[serde(default)]
    pub join_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub flags: u32,
}
