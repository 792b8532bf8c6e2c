//! Liveness and ping endpoints.

use axum::{Json, extract::State};
use chrono::Utc;
use teahouse_core::forms::{HealthResponse, MessageResponse};

use crate::state::AppState;

/// `GET /health`
///
/// Returns "ok" with the server's uptime. Checks no dependencies.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        uptime: state.uptime_secs(),
    })
}

/// `GET /api/ping`
pub async fn ping(State(state): State<AppState>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: state.config().ping_message.clone(),
    })
}
