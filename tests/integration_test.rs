use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use hazardrisk::config;
use hazardrisk::{routes, AssessmentEngine};

#[derive(Debug, Deserialize)]
struct HazardScore {
    hazard: String,
    score: f64,
    model_backed: bool,
}

#[derive(Debug, Deserialize)]
struct Assessment {
    hazards: Vec<HazardScore>,
    flood_score: Option<f64>,
    drought_score: Option<f64>,
    heat_score: Option<f64>,
    composite_score: f64,
    category: String,
    advisory: String,
    fallback_notice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelStatus {
    hazard: String,
    ready: bool,
    training_samples: usize,
}

/// Start the service on an ephemeral port with the given env overrides.
async fn spawn_app(vars: &[(&str, &str)]) -> Result<String> {
    // ---
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let cfg = config::load_with(|key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })?;

    let engine = Arc::new(AssessmentEngine::new(cfg.engine_settings())?);
    let app = routes::router(engine, cfg);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn health_reports_active_hazards() -> Result<()> {
    // ---
    let base = spawn_app(&[("RISK_HAZARDS", "flood,drought,heat")]).await?;
    let body: serde_json::Value = Client::new()
        .get(format!("{}/health", base))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["hazards"], serde_json::json!(["flood", "drought", "heat"]));
    assert_eq!(body["models_ready"], 0);

    Ok(())
}

#[tokio::test]
async fn assess_without_training_uses_fallback() -> Result<()> {
    // ---
    let base = spawn_app(&[]).await?;
    let url = format!(
        "{}/assess?rainfall_mm=50&soil_moisture_pct=80&temperature_c=22&vegetation_index=0.2&region_type=urban",
        base
    );

    let resp = Client::new().get(&url).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let a: Assessment = resp.json().await?;

    assert_eq!(a.flood_score, Some(98.0));
    assert_eq!(a.drought_score, Some(0.0));
    assert_eq!(a.heat_score, None);
    assert_eq!(a.composite_score, 49.0);
    assert_eq!(a.category, "MEDIUM");
    assert!(a.advisory.contains("drain"), "{}", a.advisory);
    assert!(a.fallback_notice.is_some());
    assert!(a.hazards.iter().all(|h| !h.model_backed));
    assert_eq!(a.hazards[0].hazard, "flood");
    assert_eq!(a.hazards[0].score, 98.0);

    Ok(())
}

#[tokio::test]
async fn assess_rejects_out_of_range_under_reject_policy() -> Result<()> {
    // ---
    let base = spawn_app(&[("RISK_SAMPLE_POLICY", "reject")]).await?;
    let url = format!(
        "{}/assess?rainfall_mm=10&soil_moisture_pct=120&temperature_c=22&vegetation_index=0.2&region_type=rural",
        base
    );

    let resp = Client::new().get(&url).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("soil_moisture_pct"));

    Ok(())
}

#[tokio::test]
async fn assess_rejects_unknown_region() -> Result<()> {
    // ---
    let base = spawn_app(&[]).await?;
    let url = format!(
        "{}/assess?rainfall_mm=10&soil_moisture_pct=50&temperature_c=22&vegetation_index=0.2&region_type=coastal",
        base
    );

    let resp = Client::new().get(&url).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn retrain_publishes_models() -> Result<()> {
    // ---
    let base = spawn_app(&[("RISK_TRAINING_SAMPLES", "300")]).await?;
    let client = Client::new();

    let resp = client
        .post(format!("{}/models/retrain?seed=7", base))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let statuses: Vec<ModelStatus> = resp.json().await?;
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].hazard, "flood");

    let current: Vec<ModelStatus> = client
        .get(format!("{}/models", base))
        .send()
        .await?
        .json()
        .await?;
    for (after, reported) in current.iter().zip(&statuses) {
        assert_eq!(after.ready, reported.ready);
        if after.ready {
            assert_eq!(after.training_samples, 300);
        }
    }

    Ok(())
}

#[tokio::test]
async fn retrain_disabled_without_training_source() -> Result<()> {
    // ---
    let base = spawn_app(&[("RISK_TRAINING_SOURCE", "none")]).await?;

    let resp = Client::new()
        .post(format!("{}/models/retrain", base))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}
