//! Cinder Runtime
//!
//! Event ingestion and dispatch for the Cinder bot client core.
//!
//! Two entry points feed the pipeline:
//!
//! - [`EventManager::handle_gateway`] receives `(tag, sequence, payload)`
//!   from the gateway transport, one event at a time and in order.
//! - [`EventManager::handle_http`] receives an interaction webhook payload
//!   and a write-once response sink, and writes exactly one response.
//!
//! Each payload is routed through the [`HandlerRegistry`] to a handler that
//! decodes it, mirrors the change into the [`Caches`](cinder_cache::Caches),
//! and returns typed [`Event`]s. The manager then fans every event out to all
//! registered [`EventListener`]s, one task per listener. A failing or
//! panicking listener is logged and never affects its siblings or ingestion.
//!
//! ```no_run
//! use cinder_runtime::{listener_fn, ClientBuilder, Event};
//!
//! # async fn run() -> Result<(), cinder_runtime::RuntimeError> {
//! let client = ClientBuilder::new()
//!     .with_listener(listener_fn(|event: &Event| {
//!         if let Event::MessageCreate(e) = event {
//!             tracing::info!(content = %e.message.content, "message");
//!         }
//!         Ok(())
//!     }))
//!     .build()?;
//!
//! client.events().handle_gateway("MESSAGE_CREATE", 1, br#"{}"#);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod bot;
mod client;
mod collector;
mod config;
mod error;
pub mod events;
pub mod handlers;
mod listener;
mod manager;
pub mod telemetry;
mod voice;

pub use bot::*;
pub use client::*;
pub use collector::*;
pub use self::config::*;
pub use error::*;
pub use events::{Event, GenericEvent, InteractionResponder, InteractionRestClient, Sequence};
pub use handlers::{HandlerRegistry, HandlerRegistryBuilder};
pub use listener::*;
pub use manager::*;
pub use voice::*;
