//! Diagnosis endpoint handler.

use crate::api::{ApiError, AppState};
use crate::diagnosis::{DiagnosisRequest, DiagnosisResult};
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

/// POST /v1/diagnose - Run the diagnosis pipeline for one request.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DiagnosisRequest>,
) -> Result<Json<DiagnosisResult>, ApiError> {
    let start = std::time::Instant::now();

    let result = state.engine.diagnose(&request).await?;

    info!(
        duration_ms = start.elapsed().as_millis() as u64,
        service = result.recommended_service.as_str(),
        urgency = result.urgency.as_str(),
        "Diagnosis completed"
    );

    Ok(Json(result))
}
