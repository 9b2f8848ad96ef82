//! The owning actor handed to handlers and carried by every event

use cinder_cache::Caches;
use cinder_types::SelfUser;
use std::fmt;
use std::sync::Arc;

use crate::events::InteractionRestClient;

/// Cheap-to-clone reference to the local actor's shared state
#[derive(Clone)]
pub struct Bot {
    inner: Arc<BotInner>,
}

struct BotInner {
    caches: Arc<Caches>,
    rest: Option<Arc<dyn InteractionRestClient>>,
}

impl Bot {
    pub fn new(caches: Arc<Caches>, rest: Option<Arc<dyn InteractionRestClient>>) -> Self {
        Self {
            inner: Arc::new(BotInner { caches, rest }),
        }
    }

    pub fn caches(&self) -> &Caches {
        &self.inner.caches
    }

    pub fn caches_arc(&self) -> Arc<Caches> {
        Arc::clone(&self.inner.caches)
    }

    /// Outbound client used to answer gateway interactions.
    pub fn rest(&self) -> Option<&Arc<dyn InteractionRestClient>> {
        self.inner.rest.as_ref()
    }

    pub fn self_user(&self) -> Option<SelfUser> {
        self.inner.caches.self_user()
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("self_user", &self.inner.caches.identity().id())
            .field("cache_flags", &self.inner.caches.cache_flags())
            .field("rest", &self.inner.rest.is_some())
            .finish()
    }
}
