// Zoom OAuth token endpoint calls

use anyhow::{Context, Result};
use reqwest::Client;

use super::types::TokenData;

/// Get the token endpoint URL for an OAuth base URL
fn get_token_url(oauth_base_url: &str) -> String {
    format!("{}/oauth/token", oauth_base_url)
}

/// Client for the Zoom OAuth token endpoint
///
/// Both grants authenticate the app with HTTP Basic client credentials and
/// pass their parameters in the query string.
#[derive(Clone)]
pub struct OAuthClient {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(
        client: Client,
        oauth_base_url: &str,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        Self {
            client,
            token_url: get_token_url(oauth_base_url),
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenData> {
        tracing::info!("Refreshing Zoom access token...");

        let data = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await
            .context("Refresh token grant failed")?;

        tracing::info!(
            "Token refreshed (expires_in: {:?}, rotated refresh token: {})",
            data.expires_in,
            data.refresh_token.is_some()
        );

        Ok(data)
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<TokenData> {
        tracing::info!("Exchanging authorization code...");

        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
        .context("Authorization code grant failed")
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenData> {
        tracing::debug!(
            "Zoom OAuth token request: url={}, client_id={}",
            self.token_url,
            self.client_id
        );

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .query(params)
            .send()
            .await
            .context("Failed to send Zoom OAuth request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                "Zoom OAuth request failed: status={}, body={}",
                status,
                error_text
            );

            // Zoom reports OAuth failures as {"reason": ..., "error": ...}
            if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&error_text) {
                if let (Some(error_code), Some(reason)) = (
                    error_json.get("error").and_then(|v| v.as_str()),
                    error_json.get("reason").and_then(|v| v.as_str()),
                ) {
                    tracing::error!(
                        "Zoom OAuth error details: error={}, reason={}",
                        error_code,
                        reason
                    );
                }
            }

            anyhow::bail!("Zoom OAuth request failed: {} - {}", status, error_text);
        }

        let data: TokenData = response
            .json()
            .await
            .context("Failed to parse Zoom OAuth response")?;

        if data.access_token.is_empty() {
            anyhow::bail!("Zoom OAuth response does not contain access_token");
        }

        Ok(data)
    }
}
