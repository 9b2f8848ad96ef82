//! Cinder Cache
//!
//! In-memory mirror of remote guild state. Each cached entity kind lives in
//! its own store, gated by a [`CacheFlags`] bit and optionally filtered by a
//! retention [`Policy`]. Every store serializes its own writes against its
//! own reads, so listeners may query while the ingestion path mutates.
//!
//! Effective permissions are never stored: [`Caches::member_permissions`] and
//! [`Caches::member_permissions_in_channel`] recompute them from the current
//! roles, members and channel overwrites on every call.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod caches;
mod channel;
mod config;
mod flags;
mod grouped;
mod guild;
mod permissions;
mod policy;
mod self_identity;

pub use caches::*;
pub use channel::*;
pub use config::*;
pub use flags::*;
pub use grouped::*;
pub use guild::*;
pub use permissions::*;
pub use policy::*;
pub use self_identity::*;
