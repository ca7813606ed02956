use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// JWT payload: user identity plus issue/expiry timestamps. Nothing else is
/// carried; the token is the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
}

/// Verification failures, kept distinct for the logs even though the HTTP
/// layer collapses both to 401.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("expired token")]
    Expired,
}

/// Signing and verification keys derived from the process-wide secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt.secret, state.config.jwt.ttl_days)
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Mint a token asserting `user_id`, expiring `ttl` from now.
    pub fn issue(&self, user_id: Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: (now + self.ttl).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "token issued");
        Ok(token)
    }

    /// Verify signature and expiry. Only an expired-signature failure maps to
    /// `Expired`; every other decode failure is `Malformed`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => {
                debug!(user_id = %data.claims.sub, "token verified");
                Ok(data.claims)
            }
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(TokenError::Expired),
            Err(_) => Err(TokenError::Malformed),
        }
    }
}

/// Access guard: extracts and verifies the bearer token, handing the resolved
/// user id to the handler. Missing header, bad scheme, malformed and expired
/// tokens all surface as one 401; the reason only reaches the log.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("missing Authorization header");
                ApiError::Unauthorized
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header is not a bearer token");
            ApiError::Unauthorized
        })?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims.sub)),
            Err(reason) => {
                warn!(%reason, "token rejected");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
