pub mod gate;
pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gate::{authorize, Decision, Owner, DENIAL_MESSAGE};

/// Identity carried by a bearer token. Only the username is asserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("{0}")]
    Invalid(String),
}

/// Signs and verifies HS256 tokens with one symmetric key.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours as i64),
        })
    }

    pub fn issue(&self, username: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Fails closed: bad signature, malformed input and expired tokens all yield `Invalid`.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::Invalid(e.to_string()))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_keeps_username() {
        let issuer = TokenIssuer::new("authentic", 1).unwrap();
        let token = issuer.issue("alice").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn other_key_fails_verification() {
        let issuer = TokenIssuer::new("authentic", 1).unwrap();
        let other = TokenIssuer::new("not-authentic", 1).unwrap();
        let token = other.issue("alice").unwrap();
        assert!(matches!(issuer.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn malformed_token_fails_verification() {
        let issuer = TokenIssuer::new("authentic", 1).unwrap();
        assert!(issuer.verify("not.a.token").is_err());
        assert!(issuer.verify("").is_err());
    }

    #[test]
    fn expired_token_fails_verification() {
        let issuer = TokenIssuer::new("authentic", 1).unwrap();
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            username: "alice".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"authentic"),
        )
        .unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn token_carries_no_password() {
        let issuer = TokenIssuer::new("authentic", 1).unwrap();
        let token = issuer.issue("alice").unwrap();
        let claims = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"authentic"),
            &Validation::default(),
        )
        .unwrap()
        .claims;
        assert_eq!(claims["username"], "alice");
        assert!(claims.get("password").is_none());
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(TokenIssuer::new("", 1), Err(JwtError::InvalidSecret)));
    }
}
