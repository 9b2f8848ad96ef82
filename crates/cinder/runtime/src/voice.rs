//! Voice dispatch interceptor

use cinder_types::{VoiceServerUpdate, VoiceState};

/// Pass-through seam for a voice connection manager.
///
/// Receives the local actor's own voice state changes and every voice server
/// update, alongside normal cache handling and dispatch. Calls happen on the
/// ingestion path and must return quickly.
pub trait VoiceDispatchInterceptor: Send + Sync {
    fn on_voice_state_update(&self, state: &VoiceState);

    fn on_voice_server_update(&self, update: &VoiceServerUpdate);
}
