//! Shared fixtures for runtime integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cinder_cache::CacheFlags;
use cinder_runtime::{Client, ClientBuilder, ClientConfig, Event, EventListener};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const SETTLE: Duration = Duration::from_millis(150);
pub const WAIT: Duration = Duration::from_secs(2);

/// Listener forwarding every event into a channel
pub struct Recorder {
    tx: mpsc::UnboundedSender<Event>,
}

#[async_trait]
impl EventListener for Recorder {
    async fn on_event(&self, event: &Event) -> anyhow::Result<()> {
        let _ = self.tx.send(event.clone());
        Ok(())
    }
}

pub fn recorder() -> (Arc<dyn EventListener>, mpsc::UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(Recorder { tx }), rx)
}

/// Next event, failing the test if none arrives in time.
pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("recorder channel closed")
}

/// Everything that arrives until the pipeline has been quiet for a while.
pub async fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(Some(event)) = tokio::time::timeout(SETTLE, rx.recv()).await {
        events.push(event);
    }
    events
}

pub fn names(events: &[Event]) -> Vec<&'static str> {
    let mut names: Vec<_> = events.iter().map(Event::name).collect();
    names.sort_unstable();
    names
}

pub fn client(flags: CacheFlags) -> Client {
    client_with(flags, false)
}

pub fn client_with(flags: CacheFlags, raw_events: bool) -> Client {
    let mut config = ClientConfig::default();
    config.cache.flags = flags;
    config.events.raw_events_enabled = raw_events;
    ClientBuilder::new()
        .with_config(config)
        .build()
        .expect("client builds")
}

pub fn bytes(value: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&value).expect("fixture serializes")
}
