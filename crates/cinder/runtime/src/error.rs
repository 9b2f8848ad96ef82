//! Error types for the runtime

use cinder_types::GatewayEventType;
use thiserror::Error;

/// Configuration defects, rejected before any ingestion starts
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("No handler registered for the HTTP interaction path")]
    MissingHttpHandler,

    #[error("Handler registered twice for event type: {0}")]
    DuplicateHandler(GatewayEventType),

    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Failures answering an interaction
#[derive(Debug, Error)]
pub enum RespondError {
    #[error("Interaction already responded to")]
    AlreadyResponded,

    #[error("Response sink closed")]
    SinkClosed,

    #[error("No REST client configured for gateway interactions")]
    NoRestClient,

    #[error("REST request failed: {0}")]
    Rest(#[source] anyhow::Error),
}
