//! Event manager
//!
//! Owns the handler registry and the listener set. Ingestion is synchronous
//! up to the point of fan-out: the handler's cache mutation completes before
//! `handle_gateway` returns, while every listener invocation runs in its own
//! task behind a failure boundary.

use cinder_types::{GatewayEventType, InteractionResponse, Message, Snowflake};
use futures::FutureExt;
use parking_lot::RwLock;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::bot::Bot;
use crate::collector::{CollectorListener, MessageCollector};
use crate::error::RuntimeError;
use crate::events::{Event, GenericEvent, RawEvent, Sequence};
use crate::handlers::{HandlerContext, HandlerRegistry};
use crate::listener::EventListener;
use crate::voice::VoiceDispatchInterceptor;

/// Immutable dispatch settings
#[derive(Debug, Clone)]
pub struct EventManagerConfig {
    /// Dispatch every gateway delivery as a [`RawEvent`] before handling.
    pub raw_events_enabled: bool,
    /// Written to the HTTP sink when nothing else answers an interaction.
    pub http_fallback: InteractionResponse,
    /// How long `handle_http` waits for a listener to respond.
    pub http_timeout: Duration,
}

/// Interaction webhooks must be answered within three seconds.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(3);

impl Default for EventManagerConfig {
    fn default() -> Self {
        Self {
            raw_events_enabled: false,
            http_fallback: InteractionResponse::pong(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl EventManagerConfig {
    pub fn with_raw_events(mut self, enabled: bool) -> Self {
        self.raw_events_enabled = enabled;
        self
    }

    pub fn with_http_fallback(mut self, response: InteractionResponse) -> Self {
        self.http_fallback = response;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

type ListenerSet = Arc<Vec<Arc<dyn EventListener>>>;

/// Routes inbound payloads to handlers and fans events out to listeners
pub struct EventManager {
    bot: Bot,
    registry: HandlerRegistry,
    config: EventManagerConfig,
    /// Copy-on-write: dispatch clones the `Arc`, mutation swaps it.
    listeners: RwLock<ListenerSet>,
    voice: RwLock<Option<Arc<dyn VoiceDispatchInterceptor>>>,
    runtime: Handle,
}

impl EventManager {
    /// Binds to the tokio runtime of the calling context.
    pub fn new(
        bot: Bot,
        registry: HandlerRegistry,
        config: EventManagerConfig,
    ) -> Result<Self, RuntimeError> {
        let runtime = Handle::try_current().map_err(|e| RuntimeError::NoRuntime(e.to_string()))?;
        Ok(Self::with_handle(bot, registry, config, runtime))
    }

    pub fn with_handle(
        bot: Bot,
        registry: HandlerRegistry,
        config: EventManagerConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            bot,
            registry,
            config,
            listeners: RwLock::new(Arc::new(Vec::new())),
            voice: RwLock::new(None),
            runtime,
        }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn config(&self) -> &EventManagerConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    // ═══════════════════════════════════════════════════════════════════
    // LISTENERS
    // ═══════════════════════════════════════════════════════════════════

    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        self.add_listeners([listener]);
    }

    pub fn add_listeners(&self, listeners: impl IntoIterator<Item = Arc<dyn EventListener>>) {
        let mut guard = self.listeners.write();
        let mut next = Vec::clone(&guard);
        next.extend(listeners);
        *guard = Arc::new(next);
    }

    /// Removes listeners by identity.
    pub fn remove_listeners(&self, listeners: &[Arc<dyn EventListener>]) {
        let mut guard = self.listeners.write();
        let next: Vec<_> = guard
            .iter()
            .filter(|l| !listeners.iter().any(|r| Arc::ptr_eq(l, r)))
            .cloned()
            .collect();
        *guard = Arc::new(next);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn set_voice_interceptor(&self, interceptor: Option<Arc<dyn VoiceDispatchInterceptor>>) {
        *self.voice.write() = interceptor;
    }

    pub fn voice_interceptor(&self) -> Option<Arc<dyn VoiceDispatchInterceptor>> {
        self.voice.read().clone()
    }

    /// Stream of created messages in `channel_id` accepted by `filter`.
    ///
    /// The collector unregisters itself when closed or dropped.
    pub fn collect_messages<F>(self: &Arc<Self>, channel_id: Snowflake, filter: F) -> MessageCollector
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let listener: Arc<dyn EventListener> =
            Arc::new(CollectorListener::new(channel_id, filter, tx));
        self.add_listener(Arc::clone(&listener));
        tracing::debug!(channel_id = %channel_id, "Message collector registered");
        MessageCollector::new(rx, listener, Arc::downgrade(self))
    }

    pub fn close(&self) {
        let count = {
            let mut guard = self.listeners.write();
            let count = guard.len();
            *guard = Arc::new(Vec::new());
            count
        };
        self.set_voice_interceptor(None);
        tracing::info!(listeners = count, "Event manager closed");
    }

    // ═══════════════════════════════════════════════════════════════════
    // INGESTION
    // ═══════════════════════════════════════════════════════════════════

    /// Handles one gateway delivery.
    ///
    /// Cache mutation happens before this returns; listeners run afterwards
    /// on their own tasks. Unknown tags are logged and dropped.
    pub fn handle_gateway(&self, event_type: &str, sequence: u64, payload: &[u8]) {
        let tag = GatewayEventType::from(event_type);

        if self.config.raw_events_enabled {
            self.dispatch(
                RawEvent {
                    generic: GenericEvent::new(self.bot.clone(), Sequence::Gateway(sequence)),
                    event_type: tag.clone(),
                    payload: Arc::from(payload),
                }
                .into(),
            );
        }

        let Some(handler) = self.registry.get(&tag) else {
            tracing::warn!(event_type = %tag, sequence, "No handler for gateway event");
            return;
        };

        let ctx = HandlerContext::new(&self.bot, Sequence::Gateway(sequence), self.voice_interceptor());
        let events = handler.handle_raw(&ctx, payload);
        tracing::trace!(event_type = %tag, sequence, events = events.len(), "Gateway event handled");

        for event in events {
            self.dispatch(event);
        }
    }

    /// Handles one webhook interaction and writes exactly one value to `sink`.
    ///
    /// Waits until a listener responds, every responder is dropped, or the
    /// configured timeout passes; the latter two write the fallback response.
    pub async fn handle_http(
        &self,
        payload: &[u8],
        sink: oneshot::Sender<InteractionResponse>,
    ) {
        let (tx, rx) = oneshot::channel();
        let ctx = HandlerContext::new(&self.bot, Sequence::Http, self.voice_interceptor());
        let events = self.registry.http().handle_http(&ctx, payload, tx);
        for event in events {
            self.dispatch(event);
        }

        let response = match tokio::time::timeout(self.config.http_timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => {
                tracing::warn!("No response produced for HTTP interaction, sending fallback");
                self.config.http_fallback.clone()
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.config.http_timeout.as_millis() as u64,
                    "HTTP interaction not answered in time, sending fallback"
                );
                self.config.http_fallback.clone()
            }
        };
        if sink.send(response).is_err() {
            tracing::warn!("HTTP response sink closed before the response was written");
        }
    }

    /// Fans `event` out to every registered listener, one task each.
    pub fn dispatch(&self, event: Event) {
        let listeners = Arc::clone(&self.listeners.read());
        if listeners.is_empty() {
            tracing::trace!(event = event.name(), "No listeners for event");
            return;
        }

        let event = Arc::new(event);
        for (index, listener) in listeners.iter().enumerate() {
            let listener = Arc::clone(listener);
            let event = Arc::clone(&event);
            self.runtime.spawn(async move {
                let outcome = AssertUnwindSafe(listener.on_event(&event))
                    .catch_unwind()
                    .await;
                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => tracing::error!(
                        listener = index,
                        listener_name = listener.name(),
                        event = event.name(),
                        error = %err,
                        "Listener failed"
                    ),
                    Err(panic) => tracing::error!(
                        listener = index,
                        listener_name = listener.name(),
                        event = event.name(),
                        panic = %panic_message(panic.as_ref()),
                        "Listener panicked"
                    ),
                }
            });
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("bot", &self.bot)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
