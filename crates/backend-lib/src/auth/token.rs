// ============================
// crates/backend-lib/src/auth/token.rs
// ============================

//! Session token issuance.
//!
//! Pure claim building + HS256 signing; no state, safe to call from any
//! number of request tasks at once. The signing secret comes from
//! configuration and its absence is rejected at startup, not here.
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use storefront_common::Account;

/// Claim set carried by a signed session token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionClaims {
    /// Account id
    pub sub: String,
    pub email: String,
    /// Display name
    pub name: String,
    pub role: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a session for the account: 1 hour, or 24 hours when the
    /// caller asked to be remembered.
    pub fn issue(
        &self,
        account: &Account,
        role: &str,
        remember: bool,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let ttl = if remember {
            Duration::hours(24)
        } else {
            Duration::hours(1)
        };

        let claims = SessionClaims {
            sub: account.id.to_string(),
            email: account.email.clone(),
            name: account.display_name(),
            role: role.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| AppError::Internal(format!("token signing failed: {err}")))
    }

    /// Verify signature and time bounds, returning the claims.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;

        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("invalid session token".into()))
    }
}
