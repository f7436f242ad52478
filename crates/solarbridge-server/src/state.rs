use std::sync::Arc;

use solarbridge_notify::Notifier;
use solarbridge_storage::AssessmentStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AssessmentStore>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(store: Arc<dyn AssessmentStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }
}
