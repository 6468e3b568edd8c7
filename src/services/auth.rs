use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

/// The scheme prefix expected in the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The subject (username).
    pub sub: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time, seconds since the Unix epoch. Optional on decode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Issues and verifies HS256 access tokens.
///
/// Tokens are stateless: validity is signature plus expiry, nothing is stored.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Creates a new `TokenService`.
    ///
    /// # Arguments
    ///
    /// * `secret` - The symmetric signing secret.
    /// * `ttl` - Lifetime of issued tokens.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Issues a token for `subject` that expires after the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_with_ttl(subject, self.ttl)
    }

    /// Issues a token for `subject` that expires after `ttl`.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: Some(now.timestamp()),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Verifies a token and returns its subject.
    ///
    /// # Returns
    ///
    /// The `sub` claim, or `ExpiredToken` / `MalformedToken`.
    pub fn verify(&self, token: &str) -> Result<String> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => {
                    tracing::debug!("Token rejected: {}", e);
                    AppError::MalformedToken
                }
            })?;

        if Utc::now().timestamp() >= claims.exp {
            return Err(AppError::ExpiredToken);
        }

        if claims.sub.is_empty() {
            return Err(AppError::MalformedToken);
        }

        Ok(claims.sub)
    }

    /// Checks credentials and issues a token for the username.
    ///
    /// Accepts only a non-empty username that equals the password.
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        let matches: bool = username.as_bytes().ct_eq(password.as_bytes()).into();

        if username.is_empty() || password.is_empty() || !matches {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("✅ Login accepted for: {}", username);
        self.issue(username)
    }

    /// Verifies an `Authorization` header value of the form `Bearer <token>`.
    pub fn authenticate_header(&self, header: Option<&str>) -> Result<String> {
        let token = header
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(AppError::MissingAuth)?;

        self.verify(token)
    }
}
