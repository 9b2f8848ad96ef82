//! Client configuration
//!
//! Layered the usual way: built-in defaults, then an optional file, then
//! `CINDER_*` environment variables (`__` separates sections, e.g.
//! `CINDER_EVENTS__RAW_EVENTS_ENABLED=true`).

use cinder_cache::{CacheConfig, CacheFlags, TimeoutClamp};
use cinder_types::{InteractionCallbackType, InteractionResponse};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::manager::{EventManagerConfig, DEFAULT_HTTP_TIMEOUT};

/// Serializable client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub events: EventsConfig,

    /// Default tracing filter; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Cache section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub flags: CacheFlags,

    #[serde(default)]
    pub timeout_clamp: TimeoutClamp,
}

/// Dispatch section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default)]
    pub raw_events_enabled: bool,

    /// Callback type of the response written when nothing answers an
    /// HTTP interaction.
    #[serde(default)]
    pub http_fallback: InteractionCallbackType,

    /// Milliseconds `handle_http` waits for a listener to respond.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            raw_events_enabled: false,
            http_fallback: InteractionCallbackType::default(),
            http_timeout_ms: default_http_timeout_ms(),
        }
    }
}

fn default_http_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_millis() as u64
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cache: CacheSettings::default(),
            events: EventsConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ClientConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Cache settings; retention policies are added through the builder.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_flags(self.cache.flags)
            .with_timeout_clamp(self.cache.timeout_clamp)
    }

    pub fn event_manager_config(&self) -> EventManagerConfig {
        EventManagerConfig {
            raw_events_enabled: self.events.raw_events_enabled,
            http_fallback: InteractionResponse::new(self.events.http_fallback, None),
            http_timeout: Duration::from_millis(self.events.http_timeout_ms),
        }
    }
}
