//! Client bootstrap

use cinder_cache::{Caches, Policy};
use cinder_types::{Member, Message};
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::bot::Bot;
use crate::config::ClientConfig;
use crate::error::RuntimeError;
use crate::events::InteractionRestClient;
use crate::handlers::{HandlerRegistry, HandlerRegistryBuilder};
use crate::listener::EventListener;
use crate::manager::EventManager;
use crate::telemetry;
use crate::voice::VoiceDispatchInterceptor;

/// Assembled runtime: caches, the bot handle and the event manager
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    bot: Bot,
    events: Arc<EventManager>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn caches(&self) -> &Caches {
        self.bot.caches()
    }

    /// Entry point for the gateway and HTTP transports.
    pub fn events(&self) -> &Arc<EventManager> {
        &self.events
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn close(&self) {
        self.events.close();
    }
}

/// Builds a [`Client`], rejecting configuration defects before any
/// ingestion can start.
pub struct ClientBuilder {
    config: ClientConfig,
    member_policy: Option<Policy<Member>>,
    message_policy: Option<Policy<Message>>,
    rest: Option<Arc<dyn InteractionRestClient>>,
    registry: Option<HandlerRegistryBuilder>,
    listeners: Vec<Arc<dyn EventListener>>,
    voice: Option<Arc<dyn VoiceDispatchInterceptor>>,
    runtime: Option<Handle>,
    init_tracing: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            member_policy: None,
            message_policy: None,
            rest: None,
            registry: None,
            listeners: Vec::new(),
            voice: None,
            runtime: None,
            init_tracing: false,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_member_policy(mut self, policy: Policy<Member>) -> Self {
        self.member_policy = Some(policy);
        self
    }

    pub fn with_message_policy(mut self, policy: Policy<Message>) -> Self {
        self.message_policy = Some(policy);
        self
    }

    /// Client used by gateway-path interaction responders.
    pub fn with_rest_client(mut self, rest: Arc<dyn InteractionRestClient>) -> Self {
        self.rest = Some(rest);
        self
    }

    /// Replaces the default handler set.
    pub fn with_handlers(mut self, registry: HandlerRegistryBuilder) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn EventListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_voice_interceptor(mut self, interceptor: Arc<dyn VoiceDispatchInterceptor>) -> Self {
        self.voice = Some(interceptor);
        self
    }

    /// Runtime listener tasks are spawned on; defaults to the current one.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Install the global tracing subscriber from `log_filter` during build.
    pub fn init_tracing(mut self) -> Self {
        self.init_tracing = true;
        self
    }

    pub fn build(self) -> Result<Client, RuntimeError> {
        if self.init_tracing {
            telemetry::init_tracing(&self.config.log_filter);
        }

        tracing::debug!("Phase 1: building caches");
        let mut cache_config = self.config.cache_config();
        cache_config.member_policy = self.member_policy;
        cache_config.message_policy = self.message_policy;
        let caches = Arc::new(Caches::new(cache_config));

        tracing::debug!("Phase 2: creating bot handle");
        let bot = Bot::new(caches, self.rest);

        tracing::debug!("Phase 3: assembling handler registry");
        let registry = self
            .registry
            .unwrap_or_else(HandlerRegistry::with_default_handlers)
            .build()?;

        tracing::debug!("Phase 4: starting event manager");
        let manager_config = self.config.event_manager_config();
        let events = match self.runtime {
            Some(handle) => EventManager::with_handle(bot.clone(), registry, manager_config, handle),
            None => EventManager::new(bot.clone(), registry, manager_config)?,
        };

        tracing::debug!("Phase 5: registering listeners");
        events.add_listeners(self.listeners);
        if let Some(voice) = self.voice {
            events.set_voice_interceptor(Some(voice));
        }

        tracing::info!(
            cache_flags = ?bot.caches().cache_flags(),
            listeners = events.listener_count(),
            raw_events = events.config().raw_events_enabled,
            "Client ready"
        );

        Ok(Client {
            config: self.config,
            bot,
            events: Arc::new(events),
        })
    }
}
