//! Engine error types.

use thiserror::Error;

/// The only errors `DiagnosisEngine::diagnose` surfaces to callers.
///
/// Both occur before any external side effect; once a request is past
/// validation and the rate limiter, the pipeline always produces a
/// `DiagnosisResult`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnoseError {
    /// A request field failed format or length validation.
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// The identity has used up its request window.
    #[error("Too many diagnosis requests; try again in about {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

impl DiagnoseError {
    pub fn invalid(field: &str, message: &str) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
