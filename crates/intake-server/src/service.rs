//! Service info and liveness endpoints.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use intake_analysis::TransportError;
use serde_json::{Value, json};

use crate::state::AppState;

const SERVICE_NAME: &str = "card-document-intake";

/// `GET /` — static service description.
pub async fn info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "description": "webhook-driven document transfer and analysis pipeline",
        "analysis_service": state.config.analysis_base_url,
    }))
}

/// `GET /health` — liveness, including a best-effort probe of the
/// analysis service. The probe result is reported, never fatal: this
/// endpoint answers `healthy` as long as the process itself is up.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let started = Instant::now();
    let (analysis_status, elapsed) = match state.analysis.health().await {
        Ok(200) => (
            "healthy".to_string(),
            Some(started.elapsed().as_secs_f64()),
        ),
        Ok(status) => (
            format!("unhealthy_status_{status}"),
            Some(started.elapsed().as_secs_f64()),
        ),
        Err(TransportError::Timeout) => ("timeout".to_string(), None),
        Err(err) => (format!("error: {err}"), None),
    };

    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "analysis_service": state.config.analysis_base_url,
        "analysis_status": analysis_status,
        "analysis_response_time_seconds": elapsed,
    }))
}
