//! HTTP interaction path: exactly one response per call

mod support;

use async_trait::async_trait;
use cinder_cache::CacheFlags;
use cinder_runtime::{listener_fn, ClientBuilder, ClientConfig, Event, EventListener, RespondError};
use cinder_types::{InteractionCallbackType, InteractionResponse};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::oneshot;

use support::{bytes, client, drain, names, recorder};

fn interaction(kind: u8) -> Value {
    json!({
        "id": "900",
        "application_id": "42",
        "token": "tok",
        "type": kind,
        "data": { "id": "1", "name": "ping", "custom_id": "btn" }
    })
}

async fn respond_to(client: &cinder_runtime::Client, payload: &[u8]) -> InteractionResponse {
    let (tx, rx) = oneshot::channel();
    tokio::time::timeout(support::WAIT, client.events().handle_http(payload, tx))
        .await
        .expect("handle_http returned in time");
    rx.await.expect("exactly one response written")
}

/// Answers every interaction with a message, from the generic event.
struct Answer;

#[async_trait]
impl EventListener for Answer {
    async fn on_event(&self, event: &Event) -> anyhow::Result<()> {
        if let Event::InteractionCreate(e) = event {
            e.responder
                .respond(InteractionResponse::message(json!({ "content": "hi" })))
                .await?;
        }
        Ok(())
    }
}

/// Tries to answer twice through the two events of one interaction.
struct DoubleAnswer {
    second: tokio::sync::mpsc::UnboundedSender<bool>,
}

#[async_trait]
impl EventListener for DoubleAnswer {
    async fn on_event(&self, event: &Event) -> anyhow::Result<()> {
        let responder = match event {
            Event::InteractionCreate(e) => &e.responder,
            Event::ComponentInteractionCreate(e) => &e.responder,
            _ => return Ok(()),
        };
        let result = responder.defer().await;
        let rejected = matches!(result, Err(RespondError::AlreadyResponded));
        let _ = self.second.send(rejected);
        Ok(())
    }
}

#[tokio::test]
async fn ping_is_answered_with_pong_and_not_dispatched() {
    let client = client(CacheFlags::DEFAULT);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    let response = respond_to(&client, &bytes(interaction(1))).await;

    assert_eq!(response, InteractionResponse::pong());
    assert!(drain(&mut rx).await.is_empty());
}

#[tokio::test]
async fn undecodable_payload_gets_fallback() {
    let client = client(CacheFlags::DEFAULT);
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    let response = respond_to(&client, b"{ definitely not an interaction").await;

    assert_eq!(response, InteractionResponse::pong());
    assert!(drain(&mut rx).await.is_empty());
}

#[tokio::test]
async fn unknown_interaction_type_gets_fallback() {
    let client = client(CacheFlags::DEFAULT);
    let response = respond_to(&client, &bytes(interaction(42))).await;
    assert_eq!(response, InteractionResponse::pong());
}

#[tokio::test]
async fn listener_response_is_forwarded() {
    let client = ClientBuilder::new()
        .with_listener(Arc::new(Answer))
        .build()
        .unwrap();

    let response = respond_to(&client, &bytes(interaction(2))).await;

    assert_eq!(response.kind, InteractionCallbackType::ChannelMessageWithSource);
    assert_eq!(response.data, Some(json!({ "content": "hi" })));
}

#[tokio::test]
async fn unanswered_interaction_gets_configured_fallback() {
    let mut config = ClientConfig::default();
    config.events.http_fallback = InteractionCallbackType::DeferredUpdateMessage;
    let client = ClientBuilder::new().with_config(config).build().unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    client.events().add_listener(listener_fn(move |event| {
        let _ = tx.send(event.name());
        Ok(())
    }));

    let response = respond_to(&client, &bytes(interaction(3))).await;
    assert_eq!(response.kind, InteractionCallbackType::DeferredUpdateMessage);

    let mut seen = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
    seen.sort_unstable();
    assert_eq!(seen, vec!["ComponentInteractionCreate", "InteractionCreate"]);
}

#[tokio::test]
async fn held_responder_times_out_into_fallback() {
    let mut config = ClientConfig::default();
    config.events.http_timeout_ms = 50;
    let client = ClientBuilder::new().with_config(config).build().unwrap();
    // keeps every event, and with it the responder, alive
    let (listener, mut rx) = recorder();
    client.events().add_listener(listener);

    let response = respond_to(&client, &bytes(interaction(2))).await;
    assert_eq!(response, InteractionResponse::pong());

    let held = drain(&mut rx).await;
    assert_eq!(
        names(&held),
        vec!["ApplicationCommandInteractionCreate", "InteractionCreate"]
    );
    let Event::InteractionCreate(e) = held
        .iter()
        .find(|e| matches!(e, Event::InteractionCreate(_)))
        .unwrap()
    else {
        unreachable!()
    };
    assert!(matches!(
        e.responder.defer().await,
        Err(RespondError::SinkClosed)
    ));
}

#[tokio::test]
async fn no_listeners_gets_fallback() {
    let client = client(CacheFlags::DEFAULT);
    let response = respond_to(&client, &bytes(interaction(5))).await;
    assert_eq!(response, InteractionResponse::pong());
}

#[tokio::test]
async fn generic_and_variant_events_share_one_response() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let client = ClientBuilder::new()
        .with_listener(Arc::new(DoubleAnswer { second: tx }))
        .build()
        .unwrap();

    let response = respond_to(&client, &bytes(interaction(3))).await;
    assert_eq!(
        response.kind,
        InteractionCallbackType::DeferredChannelMessageWithSource
    );

    let mut outcomes = vec![
        rx.recv().await.unwrap(),
        rx.recv().await.unwrap(),
    ];
    outcomes.sort_unstable();
    assert_eq!(outcomes, vec![false, true]);
}

#[tokio::test]
async fn faulty_listener_still_yields_one_response() {
    let client = ClientBuilder::new()
        .with_listener(listener_fn(|_| panic!("listener blew up")))
        .with_listener(Arc::new(Answer))
        .build()
        .unwrap();

    let response = respond_to(&client, &bytes(interaction(2))).await;
    assert_eq!(response.kind, InteractionCallbackType::ChannelMessageWithSource);
}
