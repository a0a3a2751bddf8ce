use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::TokenVerifier;
use crate::services::EventService;

/// Shared application state, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(events: EventService, verifier: TokenVerifier) -> Self {
        Self {
            events,
            verifier: Arc::new(verifier),
        }
    }
}

impl FromRef<AppState> for EventService {
    fn from_ref(state: &AppState) -> Self {
        state.events.clone()
    }
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.verifier)
    }
}
