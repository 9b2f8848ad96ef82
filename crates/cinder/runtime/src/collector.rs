//! Message collectors

use async_trait::async_trait;
use cinder_types::{Message, Snowflake};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;

use crate::events::Event;
use crate::listener::EventListener;
use crate::manager::EventManager;

/// Forwards matching created messages into a channel
pub(crate) struct CollectorListener<F> {
    channel_id: Snowflake,
    filter: F,
    tx: mpsc::UnboundedSender<Message>,
}

impl<F> CollectorListener<F> {
    pub(crate) fn new(channel_id: Snowflake, filter: F, tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            channel_id,
            filter,
            tx,
        }
    }
}

#[async_trait]
impl<F> EventListener for CollectorListener<F>
where
    F: Fn(&Message) -> bool + Send + Sync,
{
    async fn on_event(&self, event: &Event) -> anyhow::Result<()> {
        if let Event::MessageCreate(e) = event {
            if e.message.channel_id == self.channel_id && (self.filter)(&e.message) {
                // receiver gone means the collector is closing
                let _ = self.tx.send(e.message.clone());
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MessageCollector"
    }
}

/// Receiving end of [`EventManager::collect_messages`]
pub struct MessageCollector {
    rx: mpsc::UnboundedReceiver<Message>,
    listener: Option<Arc<dyn EventListener>>,
    manager: Weak<EventManager>,
}

impl MessageCollector {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<Message>,
        listener: Arc<dyn EventListener>,
        manager: Weak<EventManager>,
    ) -> Self {
        Self {
            rx,
            listener: Some(listener),
            manager,
        }
    }

    /// Next collected message; `None` once closed and drained.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    pub fn is_closed(&self) -> bool {
        self.listener.is_none()
    }

    /// Unregisters the collector. Messages already collected stay readable.
    pub fn close(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        if let Some(manager) = self.manager.upgrade() {
            manager.remove_listeners(&[listener]);
        }
        self.rx.close();
        tracing::debug!("Message collector closed");
    }
}

impl Drop for MessageCollector {
    fn drop(&mut self) {
        self.close();
    }
}
