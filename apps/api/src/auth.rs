//! Bearer token authentication.
//!
//! Tokens are issued by an external identity provider. This service only
//! verifies them: HS256 signature, issuer, audience and expiry. The `sub`
//! claim is the caller's user id and is trusted once the token verifies.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use stockroom_core::UserId;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::AppState;

/// JWT claims this service reads.
///
/// `iss` and `aud` are checked by [`Validation`] against the raw payload,
/// so they need no field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id, as a string)
    pub sub: String,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Why a request's credentials were rejected.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Authorization header is not a bearer token")]
    NotBearer,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token subject '{0}' is not a user id")]
    InvalidSubject(String),
}

/// JWT verifier configured for one issuer and audience.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Create a verifier for HS256 tokens signed with `secret`.
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        JwtVerifier {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Create a verifier from the API configuration.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.jwt_secret, &config.jwt_issuer, &config.jwt_audience)
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data: TokenData<Claims> = decode(token, &self.key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Validate a token and return the user it was issued for.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.validate_token(token)?;
        claims
            .sub
            .trim()
            .parse()
            .map_err(|_| AuthError::InvalidSubject(claims.sub.clone()))
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated caller.
///
/// Handlers that take an `AuthUser` reject unauthenticated requests with
/// `401 UNAUTHORIZED` before the body is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::NotBearer)?;

        let token = extract_bearer_token(header).ok_or(AuthError::NotBearer)?;
        let user_id = state.jwt.verify(token)?;

        Ok(AuthUser(user_id))
    }
}

/// Token minting for tests; the identity provider does this in production.
#[cfg(test)]
pub(crate) mod testing {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    pub const SECRET: &str = "test-secret";
    pub const ISSUER: &str = "https://id.stockroom.test";
    pub const AUDIENCE: &str = "stockroom";

    pub fn token_with(sub: &str, issuer: &str, audience: &str, secret: &str, ttl_secs: i64) -> String {
        let now = Utc::now();
        let claims = json!({
            "sub": sub,
            "iss": issuer,
            "aud": audience,
            "iat": now.timestamp(),
            "exp": (now + Duration::seconds(ttl_secs)).timestamp(),
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    pub fn token_for(user_id: i64) -> String {
        token_with(&user_id.to_string(), ISSUER, AUDIENCE, SECRET, 3600)
    }
}
