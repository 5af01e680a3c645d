//! JWT bearer token issuance and parsing
//!
//! Tokens carry the numeric user id as `sub` and expire after a configured
//! number of minutes. Keys are derived once and shared through `AppState`.

use anyhow::Result;
use chrono::{Duration, Utc};
use gym_routines_shared::AuthError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, decimal string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp); absent on tokens that carry only `sub` and `exp`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, algorithm: Algorithm, access_token_expire_minutes: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            algorithm,
            default_ttl: Duration::minutes(access_token_expire_minutes),
        }
    }

    /// Issue a token for `subject_id` with the configured lifetime
    #[inline]
    pub fn issue_token(&self, subject_id: i64) -> Result<String> {
        self.issue_token_with_ttl(subject_id, self.default_ttl)
    }

    /// Issue a token for `subject_id` that expires after `ttl`
    pub fn issue_token_with_ttl(&self, subject_id: i64, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id.to_string(),
            exp: (now + ttl).timestamp(),
            iat: Some(now.timestamp()),
        };

        encode(&Header::new(self.algorithm), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to generate token: {}", e))
    }

    /// Verify signature, algorithm and expiry, returning the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, self.keys.decoding(), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })
    }

    /// Verify a token and return its subject id
    pub fn parse_token(&self, token: &str) -> Result<i64, AuthError> {
        let claims = self.validate_token(token)?;
        claims.sub.parse::<i64>().map_err(|_| AuthError::InvalidToken)
    }

    /// Configured token lifetime
    #[inline]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}
