use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::AppState;
use crate::models::{RawSample, RegionType};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/assess", get(handler))
}

/// Query parameters for one assessment.
#[derive(Debug, Deserialize)]
pub struct AssessQuery {
    rainfall_mm: f64,
    soil_moisture_pct: f64,
    temperature_c: f64,
    vegetation_index: f64,
    region_type: RegionType,
}

/// JSON error body for rejected input.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

async fn handler(
    Query(params): Query<AssessQuery>,
    State((engine, _config)): State<AppState>,
) -> impl IntoResponse {
    // ---
    debug!("GET /assess - {:?}", params);

    let raw = RawSample {
        rainfall_mm: params.rainfall_mm,
        soil_moisture_pct: params.soil_moisture_pct,
        temperature_c: params.temperature_c,
        vegetation_index: params.vegetation_index,
    };

    match engine.assess_raw(&raw, params.region_type) {
        Ok(assessment) => {
            info!(
                "Assessment complete: composite {} ({})",
                assessment.composite_score(),
                assessment.category()
            );
            (StatusCode::OK, Json(assessment)).into_response()
        }
        Err(e) => {
            info!("Rejected sample: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
