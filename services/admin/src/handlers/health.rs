use axum::{extract::State, http::StatusCode};

use hrdesk_core::health::readiness_status;

use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

/// Ready once the database answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness_status(state.db.ping().await)
}
