use async_trait::async_trait;
use cinder_types::{
    ApplicationCommandInteraction, AutocompleteInteraction, ComponentInteraction, Interaction,
    InteractionCallbackType, InteractionResponse, ModalSubmitInteraction, Snowflake,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

use super::GenericEvent;
use crate::error::RespondError;

/// Outbound call answering a gateway interaction
#[async_trait]
pub trait InteractionRestClient: Send + Sync {
    async fn create_interaction_response(
        &self,
        interaction_id: Snowflake,
        token: &str,
        response: &InteractionResponse,
    ) -> anyhow::Result<()>;
}

/// Answers one interaction, at most once.
///
/// Clones share the same state, so the generic and the variant-specific
/// event for one interaction can never both respond. HTTP-path responders
/// write to the webhook's response sink; gateway-path responders go through
/// the bot's [`InteractionRestClient`].
#[derive(Clone)]
pub struct InteractionResponder {
    inner: Arc<ResponderInner>,
}

struct ResponderInner {
    interaction_id: Snowflake,
    token: String,
    responded: AtomicBool,
    target: Target,
}

enum Target {
    Http(Mutex<Option<oneshot::Sender<InteractionResponse>>>),
    Rest(Option<Arc<dyn InteractionRestClient>>),
}

impl InteractionResponder {
    pub fn http(interaction: &Interaction, sink: oneshot::Sender<InteractionResponse>) -> Self {
        Self::with_target(interaction, Target::Http(Mutex::new(Some(sink))))
    }

    pub fn rest(interaction: &Interaction, client: Option<Arc<dyn InteractionRestClient>>) -> Self {
        Self::with_target(interaction, Target::Rest(client))
    }

    fn with_target(interaction: &Interaction, target: Target) -> Self {
        Self {
            inner: Arc::new(ResponderInner {
                interaction_id: interaction.id(),
                token: interaction.token().to_string(),
                responded: AtomicBool::new(false),
                target,
            }),
        }
    }

    pub fn interaction_id(&self) -> Snowflake {
        self.inner.interaction_id
    }

    pub fn has_responded(&self) -> bool {
        self.inner.responded.load(Ordering::Acquire)
    }

    pub async fn respond(&self, response: InteractionResponse) -> Result<(), RespondError> {
        if self.inner.responded.swap(true, Ordering::AcqRel) {
            return Err(RespondError::AlreadyResponded);
        }

        match &self.inner.target {
            Target::Http(sink) => {
                let sender = sink.lock().take().ok_or(RespondError::SinkClosed)?;
                sender.send(response).map_err(|_| RespondError::SinkClosed)
            }
            Target::Rest(client) => {
                let Some(client) = client else {
                    self.inner.responded.store(false, Ordering::Release);
                    return Err(RespondError::NoRestClient);
                };
                client
                    .create_interaction_response(
                        self.inner.interaction_id,
                        &self.inner.token,
                        &response,
                    )
                    .await
                    .map_err(RespondError::Rest)
            }
        }
    }

    pub async fn respond_with(
        &self,
        kind: InteractionCallbackType,
        data: Option<serde_json::Value>,
    ) -> Result<(), RespondError> {
        self.respond(InteractionResponse::new(kind, data)).await
    }

    /// Acknowledges now and answers later.
    pub async fn defer(&self) -> Result<(), RespondError> {
        self.respond(InteractionResponse::deferred()).await
    }
}

impl fmt::Debug for InteractionResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = match self.inner.target {
            Target::Http(_) => "http",
            Target::Rest(_) => "rest",
        };
        f.debug_struct("InteractionResponder")
            .field("interaction_id", &self.inner.interaction_id)
            .field("path", &path)
            .field("responded", &self.has_responded())
            .finish()
    }
}

/// Dispatched for every interaction, alongside the variant-specific event
#[derive(Debug, Clone)]
pub struct InteractionCreate {
    pub generic: GenericEvent,
    pub interaction: Interaction,
    pub responder: InteractionResponder,
}

#[derive(Debug, Clone)]
pub struct ApplicationCommandInteractionCreate {
    pub generic: GenericEvent,
    pub interaction: ApplicationCommandInteraction,
    pub responder: InteractionResponder,
}

#[derive(Debug, Clone)]
pub struct ComponentInteractionCreate {
    pub generic: GenericEvent,
    pub interaction: ComponentInteraction,
    pub responder: InteractionResponder,
}

#[derive(Debug, Clone)]
pub struct AutocompleteInteractionCreate {
    pub generic: GenericEvent,
    pub interaction: AutocompleteInteraction,
    pub responder: InteractionResponder,
}

#[derive(Debug, Clone)]
pub struct ModalSubmitInteractionCreate {
    pub generic: GenericEvent,
    pub interaction: ModalSubmitInteraction,
    pub responder: InteractionResponder,
}
