//! Error types for the wire model

use thiserror::Error;

/// Malformed wire values
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("Invalid snowflake: {0}")]
    InvalidSnowflake(String),

    #[error("Unknown channel type: {0}")]
    UnknownChannelType(u64),

    #[error("Unknown interaction type: {0}")]
    UnknownInteractionType(u64),

    #[error("Unknown interaction callback type: {0}")]
    UnknownCallbackType(u8),

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}
