//! Interactions and interaction responses
//!
//! Interactions are user-triggered requests that need an answer: slash
//! commands, component clicks, autocomplete lookups and modal submissions,
//! plus the liveness ping the platform sends to webhook endpoints. They arrive
//! as one object shape discriminated by an integer `type`, and decode into the
//! closed [`Interaction`] sum type.

use serde::de::{self, DeserializeOwned};
use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::errors::TypesError;
use crate::member::ResolvedMember;
use crate::message::Message;
use crate::permissions::Permissions;
use crate::snowflake::Snowflake;
use crate::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    Component,
    Autocomplete,
    ModalSubmit,
}

impl InteractionType {
    pub fn code(self) -> u8 {
        match self {
            InteractionType::Ping => 1,
            InteractionType::ApplicationCommand => 2,
            InteractionType::Component => 3,
            InteractionType::Autocomplete => 4,
            InteractionType::ModalSubmit => 5,
        }
    }
}

impl TryFrom<u64> for InteractionType {
    type Error = TypesError;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(InteractionType::Ping),
            2 => Ok(InteractionType::ApplicationCommand),
            3 => Ok(InteractionType::Component),
            4 => Ok(InteractionType::Autocomplete),
            5 => Ok(InteractionType::ModalSubmit),
            other => Err(TypesError::UnknownInteractionType(other)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// INTERACTION VARIANTS
// ═══════════════════════════════════════════════════════════════════

/// Fields shared by every interaction variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseInteraction {
    pub id: Snowflake,
    pub application_id: Snowflake,
    pub token: String,
    #[serde(default)]
    pub version: u8,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    /// Present when invoked inside a guild.
    #[serde(default)]
    pub member: Option<ResolvedMember>,
    /// Present when invoked in a direct message.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub app_permissions: Option<Permissions>,
}

impl BaseInteraction {
    /// The invoking user, wherever the interaction came from.
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .map(|m| &m.member.user)
            .or(self.user.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCommandData {
    pub id: Snowflake,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub options: Vec<Value>,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub target_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentData {
    pub custom_id: String,
    #[serde(default)]
    pub component_type: u8,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalSubmitData {
    pub custom_id: String,
    #[serde(default)]
    pub components: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCommandInteraction {
    #[serde(flatten)]
    pub base: BaseInteraction,
    pub data: ApplicationCommandData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInteraction {
    #[serde(flatten)]
    pub base: BaseInteraction,
    pub data: ComponentData,
    /// The message the component is attached to.
    #[serde(default)]
    pub message: Option<Message>,
}

/// Autocomplete carries the partially typed command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteInteraction {
    #[serde(flatten)]
    pub base: BaseInteraction,
    pub data: ApplicationCommandData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalSubmitInteraction {
    #[serde(flatten)]
    pub base: BaseInteraction,
    pub data: ModalSubmitData,
}

/// Every interaction the platform can deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Ping(BaseInteraction),
    ApplicationCommand(ApplicationCommandInteraction),
    Component(ComponentInteraction),
    Autocomplete(AutocompleteInteraction),
    ModalSubmit(ModalSubmitInteraction),
}

/// The zero interaction is an empty ping.
impl Default for Interaction {
    fn default() -> Self {
        Interaction::Ping(BaseInteraction::default())
    }
}

impl Interaction {
    pub fn kind(&self) -> InteractionType {
        match self {
            Interaction::Ping(_) => InteractionType::Ping,
            Interaction::ApplicationCommand(_) => InteractionType::ApplicationCommand,
            Interaction::Component(_) => InteractionType::Component,
            Interaction::Autocomplete(_) => InteractionType::Autocomplete,
            Interaction::ModalSubmit(_) => InteractionType::ModalSubmit,
        }
    }

    pub fn base(&self) -> &BaseInteraction {
        match self {
            Interaction::Ping(b) => b,
            Interaction::ApplicationCommand(i) => &i.base,
            Interaction::Component(i) => &i.base,
            Interaction::Autocomplete(i) => &i.base,
            Interaction::ModalSubmit(i) => &i.base,
        }
    }

    pub fn id(&self) -> Snowflake {
        self.base().id
    }

    pub fn token(&self) -> &str {
        &self.base().token
    }

    pub fn is_ping(&self) -> bool {
        matches!(self, Interaction::Ping(_))
    }
}

impl<'de> Deserialize<'de> for Interaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let code = value
            .get("type")
            .and_then(Value::as_u64)
            .ok_or_else(|| de::Error::custom(TypesError::MissingField("type")))?;
        let kind = InteractionType::try_from(code).map_err(de::Error::custom)?;

        Ok(match kind {
            InteractionType::Ping => Interaction::Ping(decode(value)?),
            InteractionType::ApplicationCommand => {
                Interaction::ApplicationCommand(decode(value)?)
            }
            InteractionType::Component => Interaction::Component(decode(value)?),
            InteractionType::Autocomplete => Interaction::Autocomplete(decode(value)?),
            InteractionType::ModalSubmit => Interaction::ModalSubmit(decode(value)?),
        })
    }
}

impl Serialize for Interaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut value = match self {
            Interaction::Ping(b) => serde_json::to_value(b),
            Interaction::ApplicationCommand(i) => serde_json::to_value(i),
            Interaction::Component(i) => serde_json::to_value(i),
            Interaction::Autocomplete(i) => serde_json::to_value(i),
            Interaction::ModalSubmit(i) => serde_json::to_value(i),
        }
        .map_err(ser::Error::custom)?;
        if let Value::Object(map) = &mut value {
            map.insert("type".to_string(), Value::from(self.kind().code()));
        }
        value.serialize(serializer)
    }
}

fn decode<T: DeserializeOwned, E: de::Error>(value: Value) -> Result<T, E> {
    serde_json::from_value(value).map_err(E::custom)
}

// ═══════════════════════════════════════════════════════════════════
// RESPONSES
// ═══════════════════════════════════════════════════════════════════

/// How an interaction is answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InteractionCallbackType {
    /// Acknowledges a ping.
    #[default]
    Pong,
    ChannelMessageWithSource,
    DeferredChannelMessageWithSource,
    DeferredUpdateMessage,
    UpdateMessage,
    AutocompleteResult,
    Modal,
}

impl From<InteractionCallbackType> for u8 {
    fn from(kind: InteractionCallbackType) -> Self {
        match kind {
            InteractionCallbackType::Pong => 1,
            InteractionCallbackType::ChannelMessageWithSource => 4,
            InteractionCallbackType::DeferredChannelMessageWithSource => 5,
            InteractionCallbackType::DeferredUpdateMessage => 6,
            InteractionCallbackType::UpdateMessage => 7,
            InteractionCallbackType::AutocompleteResult => 8,
            InteractionCallbackType::Modal => 9,
        }
    }
}

impl TryFrom<u8> for InteractionCallbackType {
    type Error = TypesError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(InteractionCallbackType::Pong),
            4 => Ok(InteractionCallbackType::ChannelMessageWithSource),
            5 => Ok(InteractionCallbackType::DeferredChannelMessageWithSource),
            6 => Ok(InteractionCallbackType::DeferredUpdateMessage),
            7 => Ok(InteractionCallbackType::UpdateMessage),
            8 => Ok(InteractionCallbackType::AutocompleteResult),
            9 => Ok(InteractionCallbackType::Modal),
            other => Err(TypesError::UnknownCallbackType(other)),
        }
    }
}

/// The single value written back for an interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: InteractionCallbackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl InteractionResponse {
    pub fn new(kind: InteractionCallbackType, data: Option<Value>) -> Self {
        Self { kind, data }
    }

    /// The fixed acknowledgement for a liveness ping.
    pub fn pong() -> Self {
        Self::new(InteractionCallbackType::Pong, None)
    }

    pub fn message(data: Value) -> Self {
        Self::new(InteractionCallbackType::ChannelMessageWithSource, Some(data))
    }

    pub fn deferred() -> Self {
        Self::new(InteractionCallbackType::DeferredChannelMessageWithSource, None)
    }
}
