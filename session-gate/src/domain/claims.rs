//! Unverified JWT claim extraction for the fallback path.
//!
//! The fallback only needs the `userId` claim out of the bearer token;
//! signature verification is the upstream identity service's job and is
//! deliberately not performed here. The payload segment is base64url-decoded
//! and parsed as JSON, nothing more.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Claim carrying the user id in tokens issued by the identity service.
const USER_ID_CLAIM: &str = "userId";

/// Extract the `userId` claim from a bearer token without verifying the
/// signature.
///
/// Accepts the raw header value, with or without a `Bearer ` prefix.
/// Returns `None` for anything that is not a three-segment token with a
/// JSON payload carrying a string `userId`.
#[must_use]
pub fn user_id_claim(token: &str) -> Option<String> {
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    claims
        .get(USER_ID_CLAIM)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        format!("{header}.{body}.sig")
    }

    #[test]
    fn extracts_user_id_claim() {
        let token = token_with_payload(&json!({"userId": "u1", "exp": 1_999_999_999}));
        assert_eq!(user_id_claim(&token).as_deref(), Some("u1"));
    }

    #[test]
    fn strips_bearer_prefix() {
        let token = token_with_payload(&json!({"userId": "u1"}));
        assert_eq!(user_id_claim(&format!("Bearer {token}")).as_deref(), Some("u1"));
    }

    #[test]
    fn missing_claim_yields_none() {
        let token = token_with_payload(&json!({"sub": "u1"}));
        assert_eq!(user_id_claim(&token), None);
    }

    #[test]
    fn non_string_claim_yields_none() {
        let token = token_with_payload(&json!({"userId": 42}));
        assert_eq!(user_id_claim(&token), None);
    }

    #[test]
    fn garbage_tokens_yield_none() {
        assert_eq!(user_id_claim("not-a-jwt"), None);
        assert_eq!(user_id_claim(""), None);
        assert_eq!(user_id_claim("a.%%%.c"), None);
    }
}
