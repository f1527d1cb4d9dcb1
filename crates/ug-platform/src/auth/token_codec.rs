//! Session Token Codec
//!
//! Issues and decodes HS256-signed session tokens. A token carries the acting
//! user id and, during impersonation, the id of the administrator behind it.
//! The signature covers every claim and the lifetime is fixed by
//! [`TokenConfig`], never by the caller.
//!
//! Expiry is not enforced here; see [`SessionResolver`](super::session_resolver::SessionResolver).

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};
use ug_config::AuthConfig;

use crate::shared::clock::Clock;
use crate::shared::error::{PlatformError, Result};

pub use ug_config::DEFAULT_TOKEN_TTL_SECS;

/// Signing configuration for the codec.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret (HS256)
    pub secret: String,

    /// Token lifetime in seconds
    pub ttl_secs: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

impl From<&AuthConfig> for TokenConfig {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.clone()).with_ttl_secs(config.token_ttl_secs)
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadowing_user_id: Option<i64>,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration time (Unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    pub fn is_expired_at(&self, unix_now: i64) -> bool {
        unix_now > self.exp
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Unparseable, wrong algorithm, or signature mismatch.
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// A required claim is absent or not an integer.
    #[error("Missing or invalid claim: {0}")]
    MissingField(&'static str),
}

pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Fails with `Configuration` when no secret is set or the TTL is not positive.
    pub fn new(config: TokenConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(PlatformError::configuration("JWT secret is not set in this environment"));
        }
        if config.ttl_secs <= 0 {
            return Err(PlatformError::configuration(format!(
                "token TTL must be positive, got {}",
                config.ttl_secs
            )));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // exp is checked against the injected clock by the resolver
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        info!(ttl_secs = config.ttl_secs, "TokenCodec initialized with HS256");

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            ttl_secs: config.ttl_secs,
            clock,
        })
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a new token for `user_id`, optionally shadowed by an administrator.
    pub fn issue(&self, user_id: i64, shadowing_user_id: Option<i64>) -> Result<String> {
        let iat = self.clock.unix_now();
        let claims = SessionClaims {
            user_id,
            shadowing_user_id,
            iat,
            exp: iat + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| PlatformError::internal(format!("Failed to encode JWT: {}", e)))
    }

    /// Verify the signature and extract claims. Never panics.
    pub fn decode(&self, token: &str) -> std::result::Result<SessionClaims, DecodeError> {
        let data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                DecodeError::Malformed(e.to_string())
            })?;
        let claims = data.claims;

        Ok(SessionClaims {
            user_id: integer_claim(&claims, "userId").ok_or(DecodeError::MissingField("userId"))?,
            // a non-integer shadowing id is treated as absent
            shadowing_user_id: integer_claim(&claims, "shadowingUserId"),
            iat: integer_claim(&claims, "iat").ok_or(DecodeError::MissingField("iat"))?,
            exp: integer_claim(&claims, "exp").ok_or(DecodeError::MissingField("exp"))?,
        })
    }
}

fn integer_claim(claims: &Map<String, Value>, name: &str) -> Option<i64> {
    claims.get(name).and_then(Value::as_i64)
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}
