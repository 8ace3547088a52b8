//! Health check endpoint handler.

use crate::api::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub capabilities: Capabilities,
}

/// Which optional pipeline tiers are active in this process.
#[derive(Debug, Serialize)]
pub struct Capabilities {
    pub llm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_provider: Option<String>,
}

/// GET /health - Return service health and configured capabilities.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        capabilities: Capabilities {
            llm: state.engine.llm_configured(),
            search_provider: state.engine.search_provider().map(String::from),
        },
    })
}
