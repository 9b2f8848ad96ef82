//! Handler registry
//!
//! Maps each gateway event tag to a handler that decodes the payload,
//! mirrors the change into the cache and returns the typed events to
//! dispatch. The registry is assembled once by [`HandlerRegistryBuilder`]
//! and is immutable afterwards. One extra handler serves the HTTP
//! interaction path.

mod channel;
mod guild;
mod interaction;
mod member;
mod message;
mod ready;

pub use channel::*;
pub use guild::*;
pub use interaction::*;
pub use member::*;
pub use message::*;
pub use ready::*;

use cinder_cache::Caches;
use cinder_types::{GatewayEventType, InteractionResponse};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::bot::Bot;
use crate::error::RuntimeError;
use crate::events::{Event, GenericEvent, Sequence};
use crate::voice::VoiceDispatchInterceptor;

/// What a handler sees while processing one payload
pub struct HandlerContext<'a> {
    bot: &'a Bot,
    sequence: Sequence,
    voice: Option<Arc<dyn VoiceDispatchInterceptor>>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        bot: &'a Bot,
        sequence: Sequence,
        voice: Option<Arc<dyn VoiceDispatchInterceptor>>,
    ) -> Self {
        Self {
            bot,
            sequence,
            voice,
        }
    }

    pub fn bot(&self) -> &Bot {
        self.bot
    }

    pub fn caches(&self) -> &Caches {
        self.bot.caches()
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// A fresh envelope for events produced by this payload.
    pub fn generic(&self) -> GenericEvent {
        GenericEvent::new(self.bot.clone(), self.sequence)
    }

    pub fn voice_interceptor(&self) -> Option<&Arc<dyn VoiceDispatchInterceptor>> {
        self.voice.as_ref()
    }
}

/// Typed handler for one gateway event tag
pub trait GatewayEventHandler: Send + Sync + 'static {
    type Payload: DeserializeOwned + Default;

    fn event_type(&self) -> GatewayEventType;

    /// Value processed in place of a payload that failed to decode.
    ///
    /// Defaults to the zero payload. Returning `None` skips processing.
    fn placeholder(&self) -> Option<Self::Payload> {
        Some(Self::Payload::default())
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: Self::Payload) -> Vec<Event>;
}

/// Object-safe form of [`GatewayEventHandler`] stored in the registry
pub trait ErasedGatewayHandler: Send + Sync {
    fn event_type(&self) -> GatewayEventType;

    fn handle_raw(&self, ctx: &HandlerContext<'_>, payload: &[u8]) -> Vec<Event>;
}

impl<H: GatewayEventHandler> ErasedGatewayHandler for H {
    fn event_type(&self) -> GatewayEventType {
        GatewayEventHandler::event_type(self)
    }

    fn handle_raw(&self, ctx: &HandlerContext<'_>, payload: &[u8]) -> Vec<Event> {
        let decoded = match serde_json::from_slice::<H::Payload>(payload) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::error!(
                    event_type = %GatewayEventHandler::event_type(self),
                    sequence = ?ctx.sequence().number(),
                    error = %err,
                    "Failed to decode gateway payload, processing placeholder"
                );
                match self.placeholder() {
                    Some(placeholder) => placeholder,
                    None => return Vec::new(),
                }
            }
        };
        self.handle(ctx, decoded)
    }
}

/// Handler for the interaction webhook.
///
/// Must leave `sink` holding exactly one response or drop it; the event
/// manager writes the fallback response when the sink is dropped unused.
pub trait HttpServerEventHandler: Send + Sync {
    fn handle_http(
        &self,
        ctx: &HandlerContext<'_>,
        payload: &[u8],
        sink: oneshot::Sender<InteractionResponse>,
    ) -> Vec<Event>;
}

// ═══════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════

/// Immutable tag → handler mapping plus the HTTP handler
pub struct HandlerRegistry {
    gateway: HashMap<GatewayEventType, Arc<dyn ErasedGatewayHandler>>,
    http: Arc<dyn HttpServerEventHandler>,
}

impl HandlerRegistry {
    /// An empty builder.
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// A builder pre-filled with every built-in handler.
    pub fn with_default_handlers() -> HandlerRegistryBuilder {
        Self::builder()
            .register(ReadyHandler)
            .register(ResumedHandler)
            .register(GuildCreateHandler)
            .register(GuildUpdateHandler)
            .register(GuildDeleteHandler)
            .register(ChannelCreateHandler)
            .register(ChannelUpdateHandler)
            .register(ChannelDeleteHandler)
            .register(ChannelPinsUpdateHandler)
            .register(ThreadCreateHandler)
            .register(ThreadUpdateHandler)
            .register(ThreadDeleteHandler)
            .register(ThreadMemberUpdateHandler)
            .register(GuildRoleCreateHandler)
            .register(GuildRoleUpdateHandler)
            .register(GuildRoleDeleteHandler)
            .register(GuildMemberAddHandler)
            .register(GuildMemberUpdateHandler)
            .register(GuildMemberRemoveHandler)
            .register(MessageCreateHandler)
            .register(MessageUpdateHandler)
            .register(MessageDeleteHandler)
            .register(MessageReactionAddHandler)
            .register(MessageReactionRemoveHandler)
            .register(MessageReactionRemoveAllHandler)
            .register(MessageReactionRemoveEmojiHandler)
            .register(PresenceUpdateHandler)
            .register(VoiceStateUpdateHandler)
            .register(VoiceServerUpdateHandler)
            .register(GuildEmojisUpdateHandler)
            .register(GuildStickersUpdateHandler)
            .register(StageInstanceCreateHandler)
            .register(StageInstanceUpdateHandler)
            .register(StageInstanceDeleteHandler)
            .register(GuildScheduledEventCreateHandler)
            .register(GuildScheduledEventUpdateHandler)
            .register(GuildScheduledEventDeleteHandler)
            .register(InteractionCreateHandler)
            .http_handler(HttpInteractionHandler)
    }

    pub fn get(&self, event_type: &GatewayEventType) -> Option<&Arc<dyn ErasedGatewayHandler>> {
        self.gateway.get(event_type)
    }

    pub fn contains(&self, event_type: &GatewayEventType) -> bool {
        self.gateway.contains_key(event_type)
    }

    pub fn http(&self) -> &Arc<dyn HttpServerEventHandler> {
        &self.http
    }

    pub fn event_types(&self) -> impl Iterator<Item = &GatewayEventType> {
        self.gateway.keys()
    }

    pub fn len(&self) -> usize {
        self.gateway.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gateway.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("gateway_handlers", &self.gateway.len())
            .finish_non_exhaustive()
    }
}

/// Assembles a [`HandlerRegistry`].
///
/// Registering a tag twice is recorded and reported by [`build`](Self::build);
/// use [`replace`](Self::replace) to override a handler on purpose.
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    gateway: HashMap<GatewayEventType, Arc<dyn ErasedGatewayHandler>>,
    http: Option<Arc<dyn HttpServerEventHandler>>,
    duplicates: Vec<GatewayEventType>,
}

impl HandlerRegistryBuilder {
    pub fn register<H: GatewayEventHandler>(mut self, handler: H) -> Self {
        let event_type = GatewayEventHandler::event_type(&handler);
        if self.gateway.contains_key(&event_type) {
            self.duplicates.push(event_type);
        } else {
            self.gateway.insert(event_type, Arc::new(handler));
        }
        self
    }

    pub fn replace<H: GatewayEventHandler>(mut self, handler: H) -> Self {
        let event_type = GatewayEventHandler::event_type(&handler);
        self.gateway.insert(event_type, Arc::new(handler));
        self
    }

    pub fn remove(mut self, event_type: &GatewayEventType) -> Self {
        self.gateway.remove(event_type);
        self
    }

    pub fn http_handler<H: HttpServerEventHandler + 'static>(mut self, handler: H) -> Self {
        self.http = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<HandlerRegistry, RuntimeError> {
        if let Some(event_type) = self.duplicates.into_iter().next() {
            return Err(RuntimeError::DuplicateHandler(event_type));
        }
        let http = self.http.ok_or(RuntimeError::MissingHttpHandler)?;

        tracing::debug!(
            gateway_handlers = self.gateway.len(),
            "Handler registry assembled"
        );
        Ok(HandlerRegistry {
            gateway: self.gateway,
            http,
        })
    }
}
