// src/routes/health.rs
//! API health check endpoint for the hazard risk service.
//!
//! Used by container orchestrators and CI pipelines to verify that the
//! service is up. Alongside the static status it reports which hazards are
//! active and how many of them currently have a trained model, so a
//! deployment running purely on fallback rules is visible at a glance.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::AppState;
use crate::models::Hazard;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    hazards: Vec<Hazard>,
    models_ready: usize,
}

/// Handle `GET /health`.
///
/// Never fails; reading model status only clones the published snapshots.
async fn health(State((engine, _config)): State<AppState>) -> Json<HealthResponse> {
    // ---
    let models_ready = engine.model_statuses().iter().filter(|s| s.ready).count();

    Json(HealthResponse {
        status: "ok",
        hazards: engine.hazards(),
        models_ready,
    })
}

/// Create a subrouter containing the `/health` route.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
