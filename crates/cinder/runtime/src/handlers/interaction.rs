//! Interaction handlers for both ingestion paths
//!
//! Gateway interactions are answered through the bot's REST client. Webhook
//! interactions are answered through the response sink handed in by the
//! transport; a ping on that path is answered with a pong directly and
//! never reaches listeners.

use cinder_types::{GatewayEventType, Interaction, InteractionResponse};
use tokio::sync::oneshot;

use super::{GatewayEventHandler, HandlerContext, HttpServerEventHandler};
use crate::events::{
    ApplicationCommandInteractionCreate, AutocompleteInteractionCreate,
    ComponentInteractionCreate, Event, GenericEvent, InteractionCreate, InteractionResponder,
    ModalSubmitInteractionCreate,
};

/// The generic event followed by the variant-specific one, sharing a responder.
pub fn interaction_events(
    generic: GenericEvent,
    interaction: Interaction,
    responder: InteractionResponder,
) -> Vec<Event> {
    let specific: Option<Event> = match &interaction {
        Interaction::Ping(_) => None,
        Interaction::ApplicationCommand(i) => Some(
            ApplicationCommandInteractionCreate {
                generic: generic.clone(),
                interaction: i.clone(),
                responder: responder.clone(),
            }
            .into(),
        ),
        Interaction::Component(i) => Some(
            ComponentInteractionCreate {
                generic: generic.clone(),
                interaction: i.clone(),
                responder: responder.clone(),
            }
            .into(),
        ),
        Interaction::Autocomplete(i) => Some(
            AutocompleteInteractionCreate {
                generic: generic.clone(),
                interaction: i.clone(),
                responder: responder.clone(),
            }
            .into(),
        ),
        Interaction::ModalSubmit(i) => Some(
            ModalSubmitInteractionCreate {
                generic: generic.clone(),
                interaction: i.clone(),
                responder: responder.clone(),
            }
            .into(),
        ),
    };

    let mut events = vec![Event::from(InteractionCreate {
        generic,
        interaction,
        responder,
    })];
    events.extend(specific);
    events
}

/// INTERACTION_CREATE over the gateway
pub struct InteractionCreateHandler;

impl GatewayEventHandler for InteractionCreateHandler {
    type Payload = Interaction;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::InteractionCreate
    }

    fn handle(&self, ctx: &HandlerContext<'_>, interaction: Interaction) -> Vec<Event> {
        if interaction.is_ping() {
            tracing::warn!(
                interaction_id = %interaction.id(),
                "Ping interaction received over the gateway"
            );
        }
        let responder = InteractionResponder::rest(&interaction, ctx.bot().rest().cloned());
        interaction_events(ctx.generic(), interaction, responder)
    }
}

/// The webhook path
pub struct HttpInteractionHandler;

impl HttpServerEventHandler for HttpInteractionHandler {
    fn handle_http(
        &self,
        ctx: &HandlerContext<'_>,
        payload: &[u8],
        sink: oneshot::Sender<InteractionResponse>,
    ) -> Vec<Event> {
        let interaction = match serde_json::from_slice::<Interaction>(payload) {
            Ok(interaction) => interaction,
            Err(err) => {
                tracing::error!(error = %err, "Failed to decode interaction payload");
                return Vec::new();
            }
        };

        if interaction.is_ping() {
            tracing::debug!(interaction_id = %interaction.id(), "Answering ping with pong");
            if sink.send(InteractionResponse::pong()).is_err() {
                tracing::error!("Response sink closed before pong was written");
            }
            return Vec::new();
        }

        let responder = InteractionResponder::http(&interaction, sink);
        interaction_events(ctx.generic(), interaction, responder)
    }
}
