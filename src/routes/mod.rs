//! Route gateway for the hazard risk service.
//!
//! Each sibling module exports a subrouter over the shared [`AppState`];
//! this gateway merges them and attaches the state, so `main.rs` only
//! needs [`router`].

use std::sync::Arc;

use axum::Router;

use crate::config::Config;
use crate::engine::AssessmentEngine;

mod assess;
mod health;
mod models;

// ---

/// Shared state: the engine and the configuration snapshot.
pub type AppState = (Arc<AssessmentEngine>, Config);

pub fn router(engine: Arc<AssessmentEngine>, config: Config) -> Router {
    // ---
    Router::new()
        .merge(assess::router())
        .merge(models::router())
        .merge(health::router())
        .with_state((engine, config))
}
