//! Guild scheduled events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::snowflake::Snowflake;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum ScheduledEventStatus {
    #[default]
    Scheduled,
    Active,
    Completed,
    Canceled,
    Unknown(u8),
}

impl From<u8> for ScheduledEventStatus {
    fn from(code: u8) -> Self {
        match code {
            1 => ScheduledEventStatus::Scheduled,
            2 => ScheduledEventStatus::Active,
            3 => ScheduledEventStatus::Completed,
            4 => ScheduledEventStatus::Canceled,
            other => ScheduledEventStatus::Unknown(other),
        }
    }
}

impl From<ScheduledEventStatus> for u8 {
    fn from(status: ScheduledEventStatus) -> Self {
        match status {
            ScheduledEventStatus::Scheduled => 1,
            ScheduledEventStatus::Active => 2,
            ScheduledEventStatus::Completed => 3,
            ScheduledEventStatus::Canceled => 4,
            ScheduledEventStatus::Unknown(code) => code,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildScheduledEvent {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    #[serde(default)]
    pub creator_id: Option<Snowflake>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scheduled_start_time: DateTime<Utc>,
    #[serde(default)]
    pub scheduled_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ScheduledEventStatus,
    #[serde(default)]
    pub entity_type: u8,
    #[serde(default)]
    pub user_count: Option<u32>,
}
