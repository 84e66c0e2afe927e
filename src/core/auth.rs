//! Password hashing and bearer-token authentication
//!
//! Passwords are stored as bcrypt hashes. Successful logins receive a
//! signed HS256 token carrying the user's id, name and email; every
//! protected route extracts [`RequireAuth`], which rejects requests without
//! a valid, unexpired token.

use crate::core::error::{LogisticsError, RequestError};
use crate::core::id::RecordId;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;

/// Token type written into every issued token
pub const AUTH_TOKEN_TYPE: &str = "auth";

/// bcrypt password hashing with a fixed cost
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash on the blocking thread pool
    pub async fn hash(&self, password: &str) -> Result<String, LogisticsError> {
        let password = password.to_string();
        let cost = self.cost;

        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| LogisticsError::Internal(format!("password hashing worker failed: {e}")))?
            .map_err(|e| LogisticsError::Internal(format!("password hashing failed: {e}")))
    }

    /// Whether `password` matches `hash`; a malformed hash never matches
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, LogisticsError> {
        let password = password.to_string();
        let hash = hash.to_string();

        task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .map_err(|e| LogisticsError::Internal(format!("password verification worker failed: {e}")))
    }
}

/// Claims carried by an auth token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Expiry, seconds since the epoch
    pub exp: usize,
}

impl Claims {
    /// The authenticated user's id
    pub fn user_id(&self) -> Result<RecordId, LogisticsError> {
        RecordId::parse_str(&self.sub)
            .map_err(|_| RequestError::unauthorized("token subject is not a user id").into())
    }
}

/// Signs and verifies auth tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for a user
    pub fn issue(&self, user_id: RecordId, name: &str, email: &str) -> Result<String, LogisticsError> {
        let exp = (Utc::now() + self.ttl).timestamp().max(0) as usize;
        let claims = Claims {
            sub: user_id.to_hex(),
            name: name.to_string(),
            email: email.to_string(),
            token_type: AUTH_TOKEN_TYPE.to_string(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| LogisticsError::Internal(format!("token signing failed: {e}")))
    }

    /// Check signature, expiry and token type
    pub fn verify(&self, token: &str) -> Result<Claims, RequestError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| RequestError::unauthorized(format!("invalid token: {e}")))?;

        if data.claims.token_type != AUTH_TOKEN_TYPE {
            return Err(RequestError::unauthorized("wrong token type"));
        }
        Ok(data.claims)
    }
}

/// Extractor that requires a valid bearer token
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(claims): RequireAuth) -> String {
///     format!("Hello, {}!", claims.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Claims);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
    Arc<TokenIssuer>: FromRef<S>,
{
    type Rejection = LogisticsError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| RequestError::unauthorized("missing authorization header"))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RequestError::unauthorized("expected a bearer token"))?;

        let issuer = Arc::<TokenIssuer>::from_ref(state);
        let claims = issuer.verify(token)?;
        Ok(RequireAuth(claims))
    }
}
