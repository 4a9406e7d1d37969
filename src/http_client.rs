use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use crate::error::ApiError;
use crate::models::zoom::CreateMeetingPayload;

/// Build the shared HTTP client used for both the OAuth and REST endpoints
pub fn build_client(connect_timeout: u64, request_timeout: u64) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout))
        .timeout(Duration::from_secs(request_timeout))
        .build()
        .context("Failed to create HTTP client")
}

/// HTTP client for the Zoom REST API
///
/// Requests are sent once; there is no retry on 401 or any other status.
pub struct ZoomApiClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Base URL of the REST API, without trailing slash
    api_base_url: String,
}

impl ZoomApiClient {
    /// Create a new API client
    pub fn new(client: Client, api_base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_base_url: api_base_url.into(),
        }
    }

    fn meetings_url(&self) -> String {
        format!("{}/v2/users/me/meetings", self.api_base_url)
    }

    /// GET /v2/users/me/meetings
    pub async fn list_meetings(&self, access_token: &str) -> Result<Value, ApiError> {
        let request = self.client.get(self.meetings_url()).bearer_auth(access_token);
        self.send(request).await
    }

    /// POST /v2/users/me/meetings
    pub async fn create_meeting(
        &self,
        access_token: &str,
        payload: &CreateMeetingPayload,
    ) -> Result<Value, ApiError> {
        let request = self
            .client
            .post(self.meetings_url())
            .bearer_auth(access_token)
            .json(payload);
        self.send(request).await
    }

    /// Send a request and decode the JSON body of a successful response
    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let request = request.build().map_err(|e| ApiError::Transport {
            kind: "request_error",
            message: e.to_string(),
        })?;

        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(
            method = %method,
            url = %url,
            "Sending HTTP request"
        );

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let error_kind = error_kind(&e);
                tracing::error!(
                    error_kind = error_kind,
                    error = %e,
                    url = %url,
                    "HTTP request error"
                );
                return Err(ApiError::Transport {
                    kind: error_kind,
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        tracing::debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                url = %url,
                response_body = %error_text,
                "HTTP request failed with error response"
            );
            return Err(ApiError::ZoomApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await.map_err(|e| ApiError::Transport {
            kind: error_kind(&e),
            message: e.to_string(),
        })?;

        // 204 responses carry no body
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

/// Categorize a transport error for logging
fn error_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connection_failed"
    } else if e.is_request() {
        "request_error"
    } else if e.is_body() {
        "body_error"
    } else if e.is_decode() {
        "decode_error"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::zoom::RegisterMeetingRequest;
    use mockito::Matcher;
    use serde_json::json;

    fn api_client(base_url: &str) -> ZoomApiClient {
        ZoomApiClient::new(build_client(5, 5).unwrap(), base_url)
    }

    #[tokio::test]
    async fn test_list_meetings_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/users/me/meetings")
            .match_header("authorization", "Bearer access-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total_records":1,"meetings":[{"id":42}]}"#)
            .create_async()
            .await;

        let data = api_client(&server.url()).list_meetings("access-1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(data["meetings"][0]["id"], 42);
    }

    #[tokio::test]
    async fn test_create_meeting_sends_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/users/me/meetings")
            .match_header("authorization", "Bearer access-1")
            .match_body(Matcher::PartialJson(json!({
                "topic": "Retro",
                "type": 2,
                "settings": { "audio": "both" }
            })))
            .with_status(201)
            .with_body(r#"{"id":7,"topic":"Retro"}"#)
            .create_async()
            .await;

        let payload = CreateMeetingPayload::from_request(&RegisterMeetingRequest {
            meeting_name: "Retro".to_string(),
            selected_date_time: "2026-10-21T15:00:00Z".to_string(),
        });
        let data = api_client(&server.url())
            .create_meeting("access-1", &payload)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(data["id"], 7);
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/users/me/meetings")
            .with_status(401)
            .with_body(r#"{"code":124,"message":"Invalid access token."}"#)
            .expect(1)
            .create_async()
            .await;

        let err = api_client(&server.url())
            .list_meetings("expired")
            .await
            .unwrap_err();

        mock.assert_async().await;
        match err {
            ApiError::ZoomApiError { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid access token."));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/users/me/meetings")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = api_client(&server.url()).list_meetings("t").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Port 9 (discard) is closed on test hosts
        let err = api_client("http://127.0.0.1:9")
            .list_meetings("t")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }
}
