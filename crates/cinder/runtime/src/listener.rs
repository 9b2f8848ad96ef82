//! Listener contract

use async_trait::async_trait;

use crate::events::Event;

/// Observer of every dispatched event.
///
/// Each invocation runs in its own task. Returning `Err` or panicking is
/// logged at the dispatch boundary and affects nothing else.
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn on_event(&self, event: &Event) -> anyhow::Result<()>;

    /// Name used in fault logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Listener backed by a synchronous closure
pub struct FnListener<F> {
    f: F,
}

#[async_trait]
impl<F> EventListener for FnListener<F>
where
    F: Fn(&Event) -> anyhow::Result<()> + Send + Sync,
{
    async fn on_event(&self, event: &Event) -> anyhow::Result<()> {
        (self.f)(event)
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<F>()
    }
}

/// Wraps a closure as a shareable listener.
pub fn listener_fn<F>(f: F) -> std::sync::Arc<dyn EventListener>
where
    F: Fn(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
{
    std::sync::Arc::new(FnListener { f })
}
