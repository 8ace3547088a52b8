//! API error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::diagnosis::DiagnoseError;

/// API error response envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    /// Create a bad request error (400).
    pub fn bad_request(message: &str, param: Option<&str>) -> Self {
        Self {
            error: ApiErrorBody {
                message: message.to_string(),
                r#type: "invalid_request_error".to_string(),
                param: param.map(|p| p.to_string()),
                code: Some("invalid_request_error".to_string()),
            },
        }
    }

    /// Create a rate limit error (429).
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self {
            error: ApiErrorBody {
                message: format!(
                    "Too many diagnosis requests; try again in about {} minutes",
                    (retry_after_secs / 60).max(1)
                ),
                r#type: "rate_limit_error".to_string(),
                param: None,
                code: Some("rate_limit_exceeded".to_string()),
            },
        }
    }

    /// Get the HTTP status code for this error.
    fn status_code(&self) -> StatusCode {
        match self.error.code.as_deref() {
            Some("invalid_request_error") => StatusCode::BAD_REQUEST,
            Some("rate_limit_exceeded") => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DiagnoseError> for ApiError {
    fn from(e: DiagnoseError) -> Self {
        match e {
            DiagnoseError::InvalidInput { field, message } => {
                Self::bad_request(&message, Some(&field))
            }
            DiagnoseError::RateLimited { retry_after_secs } => {
                Self::rate_limited(retry_after_secs)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_status() {
        let error = ApiError::bad_request("not a valid email address", Some("email"));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.error.param.as_deref(), Some("email"));
    }

    #[test]
    fn test_rate_limited_status_and_message() {
        let error = ApiError::rate_limited(1800);
        assert_eq!(error.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert!(error.error.message.contains("30 minutes"));
    }

    #[test]
    fn test_rate_limited_rounds_up_to_a_minute() {
        let error = ApiError::rate_limited(30);
        assert!(error.error.message.contains("1 minutes"));
    }

    #[test]
    fn test_from_diagnose_error() {
        let error: ApiError = DiagnoseError::invalid("problem", "too short").into();
        assert_eq!(error.error.r#type, "invalid_request_error");
        assert_eq!(error.error.param.as_deref(), Some("problem"));

        let error: ApiError = DiagnoseError::RateLimited {
            retry_after_secs: 120,
        }
        .into();
        assert_eq!(error.error.code.as_deref(), Some("rate_limit_exceeded"));
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let error = ApiError::rate_limited(60);
        let json = serde_json::to_value(&error).unwrap();
        assert!(json["error"].get("param").is_none());
        assert_eq!(json["error"]["type"], "rate_limit_error");
    }
}
