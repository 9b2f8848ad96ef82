//! Cinder Wire Model
//!
//! Typed values for everything the platform pushes over the gateway or the
//! interaction webhook: ids, permission bitmasks, guild entities, the closed
//! set of channel variants and the closed set of interaction variants.
//!
//! Every type here is plain data. Nothing in this crate touches the cache or
//! the event pipeline.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod channel;
mod emoji;
mod errors;
mod gateway;
mod guild;
mod interaction;
mod member;
mod message;
mod permissions;
mod presence;
mod role;
mod scheduled;
mod snowflake;
mod user;
mod voice;

pub use channel::*;
pub use emoji::*;
pub use errors::*;
pub use gateway::*;
pub use guild::*;
pub use interaction::*;
pub use member::*;
pub use message::*;
pub use permissions::*;
pub use presence::*;
pub use role::*;
pub use scheduled::*;
pub use snowflake::*;
pub use user::*;
pub use voice::*;

/// Platform API version this model is written against
pub const API_VERSION: u8 = 10;
