//! Bearer-token authentication for account-scoped routes.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Session tokens are valid for seven days.
const TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account email.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// HS256 signing keys derived from the configured secret.
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issues a token for the given account email.
    pub fn issue(&self, email: &str) -> Result<String, ApiError> {
        let claims = Claims {
            sub: email.to_string(),
            exp: (Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to issue token: {}", e)))
    }

    /// Extracts and verifies the bearer token, returning the account email.
    pub fn verify_bearer(&self, headers: &HeaderMap) -> Result<String, ApiError> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("No token."))?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header);
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| ApiError::unauthorized("Invalid token."))?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn keys() -> AuthKeys {
        AuthKeys::from_secret(b"test-secret")
    }

    fn headers_with(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn issue_then_verify_roundtrip() {
        let keys = keys();
        let token = keys.issue("ana@example.com").unwrap();
        let email = keys.verify_bearer(&headers_with(&token)).unwrap();
        assert_eq!(email, "ana@example.com");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let error = keys().verify_bearer(&HeaderMap::new()).unwrap_err();
        assert_eq!(error.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = keys();
        let token = keys.issue("ana@example.com").unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(keys.verify_bearer(&headers_with(&tampered)).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = AuthKeys::from_secret(b"different-secret");
        let token = other.issue("ana@example.com").unwrap();
        assert!(keys().verify_bearer(&headers_with(&token)).is_err());
    }
}
