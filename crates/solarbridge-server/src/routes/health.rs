use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

pub const LIVENESS_MESSAGE: &str = "☀️ SolarBridge backend is running";

/// Plain-text liveness string served at `/`.
pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub storage: &'static str,
    pub notify_mode: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        storage: state.store.backend(),
        notify_mode: state.notifier.mode(),
    })
}
