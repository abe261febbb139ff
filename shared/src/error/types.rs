//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every failure that reaches the HTTP boundary is expressed as an `AppError`:
/// - a standardized [`ErrorCode`] (which also fixes the HTTP status)
/// - a human-readable message
/// - optional structured details (offending field, id, ...)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a required-field error naming the missing field
    pub fn required(field: &str) -> Self {
        Self::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_detail("field", field)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Whiskey lookup by id failed
    pub fn whiskey_not_found(id: i64) -> Self {
        Self::with_message(
            ErrorCode::WhiskeyNotFound,
            format!("Whiskey not found. ID: {id}"),
        )
        .with_detail("id", id)
    }

    /// Create a file storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }
}

/// Unified API error body
///
/// Serialized as `{ code, message, details? }`. Successful endpoints return
/// their payload directly; this envelope is what failures look like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message
    pub message: String,
    /// Additional error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Bad whiskey payload")
            .with_detail("field", "abv")
            .with_detail("reason", "not a number");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "abv");
        assert_eq!(details.get("reason").unwrap(), "not a number");
    }

    #[test]
    fn test_whiskey_not_found_message() {
        let err = AppError::whiskey_not_found(42);
        assert_eq!(err.code, ErrorCode::WhiskeyNotFound);
        assert_eq!(err.message, "Whiskey not found. ID: 42");
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.details.unwrap().get("id").unwrap(), 42);
    }

    #[test]
    fn test_required_field() {
        let err = AppError::required("brand");
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "brand is required");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_convenience_constructors() {
        let err = AppError::not_found("Image");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Image not found");

        assert_eq!(AppError::storage("x").code, ErrorCode::StorageError);
        assert_eq!(
            AppError::invalid_request("x").code,
            ErrorCode::InvalidRequest
        );
    }

    #[test]
    fn test_api_response_error_serialize() {
        let err = AppError::whiskey_not_found(7);
        let response = ApiResponse::error(&err);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["code"], 6001);
        assert_eq!(json["message"], "Whiskey not found. ID: 7");
        assert_eq!(json["details"]["id"], 7);
    }

    #[test]
    fn test_api_response_without_details() {
        let response = ApiResponse::error(&AppError::new(ErrorCode::InternalError));
        assert_eq!(response.code, Some(9001));
        assert_eq!(response.message, "Internal server error");

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::new(ErrorCode::InvalidSort).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::storage("disk full").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
