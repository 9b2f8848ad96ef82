//! Roles

use serde::{Deserialize, Serialize};

use crate::permissions::Permissions;
use crate::snowflake::Snowflake;

/// A guild role.
///
/// The role whose id equals its guild id is the guild's "everyone" role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    /// Not part of the wire object; filled in by the handler from the envelope.
    #[serde(default)]
    pub guild_id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

impl Role {
    pub fn new(id: Snowflake, guild_id: Snowflake, permissions: Permissions) -> Self {
        Self {
            id,
            guild_id,
            permissions,
            ..Self::default()
        }
    }

    pub fn is_everyone(&self) -> bool {
        self.id == self.guild_id
    }
}
