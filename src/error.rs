// Error handling module
// Defines error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Body returned for every failed meeting request
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong!";

/// Plain-text body returned when an authorization code can't be exchanged
pub const EXCHANGE_FAILURE_BODY: &str = "Error";

/// API errors that can occur during request processing
///
/// Every variant renders as a 400 with a fixed body; the detail only ever
/// reaches the logs.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authorization code exchange failed
    #[error("Code exchange failed: {0}")]
    CodeExchange(String),

    /// Request body could not be read as a meeting request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Zoom API answered with a non-success status
    #[error("Zoom API error: {status} - {message}")]
    ZoomApiError { status: u16, message: String },

    /// Zoom API could not be reached
    #[error("Zoom API request failed ({kind}): {message}")]
    Transport { kind: &'static str, message: String },

    /// Zoom API answered with a body that isn't JSON
    #[error("Invalid Zoom API response: {0}")]
    InvalidResponse(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Error: {}", self);

        match self {
            ApiError::CodeExchange(_) => {
                (StatusCode::BAD_REQUEST, EXCHANGE_FAILURE_BODY).into_response()
            }
            ApiError::InvalidRequest(_)
            | ApiError::ZoomApiError { .. }
            | ApiError::Transport { .. }
            | ApiError::InvalidResponse(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": GENERIC_FAILURE_MESSAGE })),
            )
                .into_response(),
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_error_messages() {
        let err = ApiError::CodeExchange("invalid_grant".to_string());
        assert_eq!(err.to_string(), "Code exchange failed: invalid_grant");

        let err = ApiError::InvalidRequest("missing field `selectedDateTime`".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid request: missing field `selectedDateTime`"
        );

        let err = ApiError::ZoomApiError {
            status: 401,
            message: "Invalid access token.".to_string(),
        };
        assert_eq!(err.to_string(), "Zoom API error: 401 - Invalid access token.");

        let err = ApiError::Transport {
            kind: "timeout",
            message: "operation timed out".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Zoom API request failed (timeout): operation timed out"
        );
    }

    #[tokio::test]
    async fn test_code_exchange_response_is_plain_text() {
        let response = ApiError::CodeExchange("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "Error");
    }

    #[tokio::test]
    async fn test_upstream_statuses_collapse_to_400() {
        for status in [400u16, 401, 403, 404, 429, 500, 503] {
            let response = ApiError::ZoomApiError {
                status,
                message: "upstream detail".to_string(),
            }
            .into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let body: serde_json::Value =
                serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(body, json!({ "message": "Something went wrong!" }));
        }
    }

    #[tokio::test]
    async fn test_transport_and_decode_errors_collapse_to_400() {
        let response = ApiError::Transport {
            kind: "connection_failed",
            message: "refused".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::InvalidResponse("expected value".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Something went wrong!"));
    }

    #[tokio::test]
    async fn test_invalid_request_collapses_to_400() {
        let response = ApiError::InvalidRequest("expected `,` or `}`".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body, json!({ "message": "Something went wrong!" }));
    }
}
