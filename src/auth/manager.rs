use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::oauth::OAuthClient;
use super::types::{Credential, TokenData};

/// Shorten a token for log output
fn token_preview(token: &str) -> &str {
    token
        .char_indices()
        .nth(12)
        .map_or(token, |(idx, _)| &token[..idx])
}

/// Startup warning for a seed token that will need a refresh
fn initial_token_warning(credential: &Credential, now: DateTime<Utc>) -> Option<String> {
    match credential.expires_at {
        None => Some(
            "Initial token has no readable expiry, it will be refreshed on first use".to_string(),
        ),
        Some(exp) if credential.is_expired_at(now) => Some(format!(
            "Initial token expired at {}, it will be refreshed on first use",
            exp.to_rfc3339()
        )),
        Some(_) => None,
    }
}

/// Token manager
/// Holds the shared Zoom credential and refreshes it when it has expired
pub struct TokenManager {
    /// Current credential
    credential: Arc<RwLock<Credential>>,

    /// Refresh token (replaced when the auth server rotates it)
    refresh_token: Arc<RwLock<String>>,

    /// OAuth token endpoint client
    oauth: OAuthClient,

    /// Whether tokens obtained from an authorization code replace the credential
    adopt_exchanged_token: bool,
}

impl TokenManager {
    /// Create a new TokenManager seeded with the configured tokens
    pub fn new(
        initial_token: String,
        refresh_token: String,
        oauth: OAuthClient,
        adopt_exchanged_token: bool,
    ) -> Self {
        let credential = Credential::from_token(initial_token);

        if let Some(warning) = initial_token_warning(&credential, Utc::now()) {
            tracing::warn!("{}", warning);
        } else if let Some(exp) = credential.expires_at {
            tracing::info!(
                "Initial token {}... expires at {}",
                token_preview(&credential.access_token),
                exp.to_rfc3339()
            );
        }

        Self {
            credential: Arc::new(RwLock::new(credential)),
            refresh_token: Arc::new(RwLock::new(refresh_token)),
            oauth,
            adopt_exchanged_token,
        }
    }

    /// Refresh the credential if it has expired
    ///
    /// Failures are logged and the stale credential stays in place; callers
    /// proceed with whatever token is current.
    pub async fn ensure_valid(&self) {
        if !self.credential.read().await.is_expired() {
            return;
        }

        let mut credential = self.credential.write().await;

        // Another request may have refreshed while we waited for the lock
        if !credential.is_expired() {
            tracing::debug!("Token already refreshed by a concurrent request");
            return;
        }

        tracing::info!(
            "Access token {}... expired, refreshing",
            token_preview(&credential.access_token)
        );

        let refresh_token = self.refresh_token.read().await.clone();
        match self.oauth.refresh(&refresh_token).await {
            Ok(data) => {
                *credential = Credential::from_token_data(&data);
                self.store_rotated_refresh_token(&data).await;
                tracing::info!(
                    "Token updated: {}... (expires: {:?})",
                    token_preview(&credential.access_token),
                    credential.expires_at.map(|e| e.to_rfc3339())
                );
            }
            Err(e) => {
                tracing::error!("Error updating token: {:#}", e);
            }
        }
    }

    /// Exchange an authorization code and return the raw access token
    ///
    /// The shared credential is left untouched unless the manager was built
    /// with `adopt_exchanged_token`.
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let data = self.oauth.exchange_code(code).await?;
        tracing::info!(
            "Access token obtained from code: {}...",
            token_preview(&data.access_token)
        );

        if self.adopt_exchanged_token {
            let mut credential = self.credential.write().await;
            *credential = Credential::from_token_data(&data);
            self.store_rotated_refresh_token(&data).await;
            tracing::info!("Exchanged token adopted as the shared credential");
        }

        Ok(data.access_token)
    }

    async fn store_rotated_refresh_token(&self, data: &TokenData) {
        if let Some(ref new_refresh_token) = data.refresh_token {
            let mut refresh_token = self.refresh_token.write().await;
            *refresh_token = new_refresh_token.clone();
        }
    }

    /// Current access token, without any expiry check
    pub async fn access_token(&self) -> String {
        self.credential.read().await.access_token.clone()
    }

    /// Expiry of the current access token
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.credential.read().await.expires_at
    }

    /// Check if the current access token has expired
    pub async fn is_expired(&self) -> bool {
        self.credential.read().await.is_expired()
    }
}
