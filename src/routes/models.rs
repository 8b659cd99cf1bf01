use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get,
    routing::post, Json, Router,
};
use serde::Deserialize;
use tracing::{error, info};

use super::assess::ErrorBody;
use super::AppState;
use crate::config::TrainingSource;
use crate::synthetic;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/models", get(status))
        .route("/models/retrain", post(retrain))
}

async fn status(State((engine, _config)): State<AppState>) -> impl IntoResponse {
    Json(engine.model_statuses())
}

/// Optional seed override for a retrain.
#[derive(Debug, Deserialize)]
pub struct RetrainQuery {
    seed: Option<u64>,
}

fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

async fn retrain(
    Query(params): Query<RetrainQuery>,
    State((engine, config)): State<AppState>,
) -> impl IntoResponse {
    // ---
    if config.training_source == TrainingSource::None {
        return error_response(
            StatusCode::CONFLICT,
            "Training is disabled (RISK_TRAINING_SOURCE=none)".to_string(),
        );
    }

    let seed = params.seed.unwrap_or(config.training_seed);
    let count = config.training_samples;
    info!("POST /models/retrain - {} samples, seed {}", count, seed);

    // Fitting is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        synthetic::generate(count, seed).map(|samples| engine.retrain(&samples))
    })
    .await;

    match result {
        Ok(Ok(statuses)) => (StatusCode::OK, Json(statuses)).into_response(),
        Ok(Err(e)) => {
            error!("Failed to generate training samples: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!("Retrain task failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Retrain task failed".to_string(),
            )
        }
    }
}
