//! # HTTP Error Type
//!
//! Maps the bridge's `ApiError` codes onto HTTP statuses and the
//! `{"error": "..."}` JSON body the web client expects.
//!
//! ## Status Mapping
//! ```text
//! INVALID_REFERENCE | INVALID_INVOICE | VALIDATION_ERROR → 400
//! NOT_FOUND                                              → 404
//! CONFLICT                                               → 409
//! ALLOCATION_ERROR | STORAGE_ERROR | INTERNAL            → 500
//! ```
//! Client-fixable failures are 4xx; systemic failures are 5xx, with raw
//! storage detail already scrubbed by the bridge layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use billing_bridge::{ApiError, ErrorCode};

/// An error response from an HTTP handler.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    /// A 400 validation error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        HttpError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status = match err.code {
            ErrorCode::InvalidReference
            | ErrorCode::InvalidInvoice
            | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::AllocationError | ErrorCode::StorageError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        HttpError {
            status,
            message: err.message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorCode::InvalidReference, StatusCode::BAD_REQUEST),
            (ErrorCode::InvalidInvoice, StatusCode::BAD_REQUEST),
            (ErrorCode::ValidationError, StatusCode::BAD_REQUEST),
            (ErrorCode::NotFound, StatusCode::NOT_FOUND),
            (ErrorCode::Conflict, StatusCode::CONFLICT),
            (ErrorCode::AllocationError, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorCode::StorageError, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorCode::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (code, expected) in cases {
            let http: HttpError = ApiError::new(code, "x").into();
            assert_eq!(http.status, expected, "{code:?}");
        }
    }
}
