//! Bearer-token identity and role checks.
//!
//! Tokens are HS256 JWTs carrying `{id, role, iat, exp}`, signed with the
//! process-wide `JWT_SECRET`. A missing credential is `Unauthorized`; a
//! credential that fails verification or lacks the required role is
//! `Forbidden`.

use std::fmt;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::utils::error::AppError;

/// Lifetime of tokens minted by [`TokenVerifier::issue`].
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Organizer,
    Volunteer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Organizer => f.write_str("organizer"),
            Role::Volunteer => f.write_str("volunteer"),
        }
    }
}

/// The caller of a request, as asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Capability required by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any verified identity.
    Authenticated,
    /// A verified identity holding this role.
    Role(Role),
}

impl Access {
    pub fn authorize(self, identity: &Identity) -> Result<(), AppError> {
        match self {
            Access::Authenticated => Ok(()),
            Access::Role(required) if identity.role == required => Ok(()),
            Access::Role(required) => Err(AppError::Forbidden(format!(
                "Requires the {} role",
                required
            ))),
        }
    }
}

pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verify `credential` and check it against `access`.
    pub fn verify(&self, credential: Option<&str>, access: Access) -> Result<Identity, AppError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Unauthorized - no token".to_string()))?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AppError::Forbidden("Forbidden".to_string())
            })?
            .claims;

        let identity = Identity {
            user_id: claims.id,
            role: claims.role,
        };
        access.authorize(&identity)?;
        Ok(identity)
    }

    /// Sign a token for `user_id` valid for [`DEFAULT_TOKEN_TTL_HOURS`].
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_with_ttl(user_id, role, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn issue_with_ttl(
        &self,
        user_id: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            id: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }
}

/// Credential from an `Authorization: <scheme> <token>` header, if any.
///
/// The scheme is not checked: whatever follows the first space is handed to
/// the verifier, so a present but unusable credential is rejected there.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let (_scheme, token) = headers.get(AUTHORIZATION)?.to_str().ok()?.split_once(' ')?;
    Some(token.trim()).filter(|t| !t.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    Arc<TokenVerifier>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<TokenVerifier>::from_ref(state);
        verifier.verify(bearer_token(&parts.headers), Access::Authenticated)
    }
}
