//! Readiness endpoint

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::ready_response;
use database::mongodb::check_health_detailed;
use tracing::{debug, warn};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when MongoDB answers a ping, 503 otherwise
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = check_health_detailed(&state.mongo_client).await;

    match &status.message {
        Some(error) => warn!(%error, latency_ms = status.response_time_ms, "MongoDB ping failed"),
        None => debug!(latency_ms = status.response_time_ms, "MongoDB ping"),
    }

    ready_response(status.healthy)
}
