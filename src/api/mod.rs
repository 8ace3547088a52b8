//! # Diagnosis API
//!
//! HTTP surface over the diagnosis engine, consumed by the booking
//! site's frontend.
//!
//! ## Endpoints
//!
//! - `POST /v1/diagnose` - Run the diagnosis pipeline for one request
//! - `GET /health` - Service health and configured capabilities
//!
//! ## Error Handling
//!
//! The engine's two pre-flight errors are the only error responses:
//!
//! ```json
//! {
//!   "error": {
//!     "message": "not a valid email address",
//!     "type": "invalid_request_error",
//!     "param": "email",
//!     "code": "invalid_request_error"
//!   }
//! }
//! ```
//!
//! Everything past those gates returns 200 with a diagnosis; upstream
//! failures degrade inside the pipeline instead of surfacing here.

mod diagnose;
mod health;
pub mod types;

pub use types::*;

use crate::config::TriageConfig;
use crate::diagnosis::DiagnosisEngine;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub engine: Arc<DiagnosisEngine>,
    pub config: Arc<TriageConfig>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state with the given engine and configuration.
    pub fn new(engine: Arc<DiagnosisEngine>, config: Arc<TriageConfig>) -> Self {
        Self {
            engine,
            config,
            start_time: Instant::now(),
        }
    }
}

/// Create the application router with all endpoints.
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body = state.config.server.max_body_bytes;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .route("/v1/diagnose", post(diagnose::handle))
        .route("/health", get(health::handle))
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
