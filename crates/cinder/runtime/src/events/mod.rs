//! Typed events
//!
//! Every event struct carries its own copy of the shared [`GenericEvent`]
//! envelope in a `generic` field. [`Event`] is the closed set of everything a
//! listener can receive; [`Event::generic`] is the one accessor for the
//! envelope regardless of variant.

mod channel;
mod guild;
mod interaction;
mod member;
mod message;

pub use channel::*;
pub use guild::*;
pub use interaction::*;
pub use member::*;
pub use message::*;

use cinder_types::GatewayEventType;
use std::sync::Arc;

use crate::bot::Bot;

/// Where an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    /// Gateway dispatch with its sequence number.
    Gateway(u64),
    /// Interaction webhook; not sequenced.
    Http,
}

impl Sequence {
    pub fn number(self) -> Option<u64> {
        match self {
            Sequence::Gateway(n) => Some(n),
            Sequence::Http => None,
        }
    }
}

/// Envelope shared by every event
#[derive(Debug, Clone)]
pub struct GenericEvent {
    bot: Bot,
    sequence: Sequence,
}

impl GenericEvent {
    pub fn new(bot: Bot, sequence: Sequence) -> Self {
        Self { bot, sequence }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }
}

/// Undecoded gateway delivery, dispatched before handling when raw events are on
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub generic: GenericEvent,
    pub event_type: GatewayEventType,
    pub payload: Arc<[u8]>,
}

macro_rules! events {
    ($($variant:ident,)*) => {
        /// Everything a listener can receive
        #[derive(Debug, Clone)]
        pub enum Event {
            $($variant($variant),)*
        }

        impl Event {
            pub fn generic(&self) -> &GenericEvent {
                match self {
                    $(Event::$variant(e) => &e.generic,)*
                }
            }

            /// Variant name, for logs.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Event::$variant(_) => stringify!($variant),)*
                }
            }
        }

        $(
            impl From<$variant> for Event {
                fn from(event: $variant) -> Self {
                    Event::$variant(event)
                }
            }
        )*
    };
}

events! {
    RawEvent,
    Ready,
    Resumed,
    GuildJoin,
    GuildAvailable,
    GuildReady,
    GuildsReady,
    GuildUpdate,
    GuildLeave,
    GuildUnavailable,
    RoleCreate,
    RoleUpdate,
    RoleDelete,
    EmojiCreate,
    EmojiUpdate,
    EmojiDelete,
    StickerCreate,
    StickerUpdate,
    StickerDelete,
    StageInstanceCreate,
    StageInstanceUpdate,
    StageInstanceDelete,
    GuildScheduledEventCreate,
    GuildScheduledEventUpdate,
    GuildScheduledEventDelete,
    GuildChannelCreate,
    GuildChannelUpdate,
    GuildChannelDelete,
    DmChannelCreate,
    DmChannelUpdate,
    DmChannelDelete,
    ChannelPinsUpdate,
    ThreadCreate,
    ThreadUpdate,
    ThreadDelete,
    ThreadMemberUpdate,
    GuildMemberJoin,
    GuildMemberUpdate,
    GuildMemberLeave,
    PresenceUpdate,
    VoiceStateUpdate,
    VoiceServerUpdate,
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    GuildMessageReactionAdd,
    GuildMessageReactionRemove,
    GuildMessageReactionRemoveAll,
    GuildMessageReactionRemoveEmoji,
    DmMessageReactionAdd,
    DmMessageReactionRemove,
    DmMessageReactionRemoveAll,
    DmMessageReactionRemoveEmoji,
    InteractionCreate,
    ApplicationCommandInteractionCreate,
    ComponentInteractionCreate,
    AutocompleteInteractionCreate,
    ModalSubmitInteractionCreate,
}

impl Event {
    pub fn bot(&self) -> &Bot {
        self.generic().bot()
    }

    pub fn sequence(&self) -> Sequence {
        self.generic().sequence()
    }
}
