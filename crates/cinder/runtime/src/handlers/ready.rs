//! Session lifecycle handlers

use cinder_types::{GatewayEventType, ReadyPayload};
use serde::de::IgnoredAny;

use super::{GatewayEventHandler, HandlerContext};
use crate::events::{Event, GuildsReady, Ready, Resumed};

/// READY: records the local identity and marks announced guilds unready
pub struct ReadyHandler;

impl GatewayEventHandler for ReadyHandler {
    type Payload = ReadyPayload;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::Ready
    }

    fn handle(&self, ctx: &HandlerContext<'_>, payload: ReadyPayload) -> Vec<Event> {
        let caches = ctx.caches();
        caches.put_self_user(payload.user.clone());

        let guild_ids: Vec<_> = payload.guilds.iter().map(|g| g.id).collect();
        for guild_id in &guild_ids {
            caches.guilds().set_unready(*guild_id, true);
        }

        tracing::info!(
            user_id = %payload.user.id(),
            session_id = %payload.session_id,
            guilds = guild_ids.len(),
            "Gateway session ready"
        );

        let no_guilds = guild_ids.is_empty();
        let mut events = vec![Event::from(Ready {
            generic: ctx.generic(),
            self_user: payload.user,
            session_id: payload.session_id,
            guild_ids,
        })];
        if no_guilds {
            events.push(
                GuildsReady {
                    generic: ctx.generic(),
                }
                .into(),
            );
        }
        events
    }
}

/// RESUMED carries no state worth decoding
pub struct ResumedHandler;

impl GatewayEventHandler for ResumedHandler {
    type Payload = IgnoredAny;

    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::Resumed
    }

    fn handle(&self, ctx: &HandlerContext<'_>, _payload: IgnoredAny) -> Vec<Event> {
        tracing::debug!("Gateway session resumed");
        vec![Resumed {
            generic: ctx.generic(),
        }
        .into()]
    }
}
