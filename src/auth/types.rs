// Authentication types

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::jwt::decode_expiry;

/// The process-wide access credential
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub access_token: String,
    /// Decoded from the token's `exp` claim; `None` when it can't be read
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Build a credential, reading the expiry from the token itself
    pub fn from_token(access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        let expires_at = decode_expiry(&access_token);
        Self {
            access_token,
            expires_at,
        }
    }

    /// Build a credential from a token endpoint response
    ///
    /// The JWT `exp` claim wins; `expires_in` is only used for opaque tokens.
    pub fn from_token_data(data: &TokenData) -> Self {
        let mut credential = Self::from_token(data.access_token.clone());
        if credential.expires_at.is_none() {
            credential.expires_at = data.expires_in.and_then(expiry_from_now);
        }
        credential
    }

    /// Expired relative to `now`; unknown expiry counts as expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            None => true,
            Some(exp) => exp < now,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// `now + secs`, or `None` when the lifetime doesn't fit a timestamp
fn expiry_from_now(secs: u64) -> Option<DateTime<Utc>> {
    let lifetime = i64::try_from(secs).ok().and_then(Duration::try_seconds)?;
    Utc::now().checked_add_signed(lifetime)
}

/// Token endpoint response (`POST /oauth/token`)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenData {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}
