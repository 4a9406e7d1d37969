// JWT expiry decoding
//
// The relay never owns the signing key, so the token is decoded without
// signature verification purely to read its `exp` claim.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT access token
///
/// Returns `None` for anything that isn't a decodable JWT or has no `exp`.
pub fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let data = match jsonwebtoken::decode::<ExpiryClaims>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    ) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!("Access token is not a decodable JWT: {}", e);
            return None;
        }
    };

    data.claims
        .exp
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;
    use chrono::Duration;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use proptest::prelude::*;
    use serde_json::json;

    fn jwt(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"zoom-signing-key"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_expiry_reads_exp_claim() {
        let token = jwt(json!({ "aud": "https://oauth.zoom.us", "exp": 1_700_000_000 }));
        let exp = decode_expiry(&token).unwrap();
        assert_eq!(exp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_decode_expiry_ignores_signature() {
        let token = jwt(json!({ "exp": 1_700_000_000 }));
        let (rest, _) = token.rsplit_once('.').unwrap();
        let tampered = format!("{}.c2lnbmF0dXJl", rest);
        assert_eq!(decode_expiry(&tampered).unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_decode_expiry_missing_exp() {
        let token = jwt(json!({ "uid": "abc" }));
        assert_eq!(decode_expiry(&token), None);
    }

    #[test]
    fn test_decode_expiry_garbage() {
        assert_eq!(decode_expiry(""), None);
        assert_eq!(decode_expiry("not-a-jwt"), None);
        assert_eq!(decode_expiry("a.b.c"), None);
    }

    proptest! {
        #[test]
        fn expired_iff_exp_in_the_past(offset in 60i64..86_400i64, past in any::<bool>()) {
            let now = Utc::now();
            let exp = if past { now - Duration::seconds(offset) } else { now + Duration::seconds(offset) };
            let credential = Credential::from_token(jwt(json!({ "exp": exp.timestamp() })));
            prop_assert_eq!(credential.is_expired_at(now), past);
        }
    }
}
