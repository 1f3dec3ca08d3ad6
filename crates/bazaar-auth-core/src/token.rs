//! Signed access/refresh token issuance and verification
//!
//! Both kinds are HS256 JWTs carrying the same claim set, but each kind is
//! signed with its own secret so one verifier never accepts the other kind.

use bazaar_types::UserId;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::{AuthConfig, AuthError};

/// Claims embedded in both token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject user
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// Unique token ID
    pub jti: Uuid,
}

impl TokenClaims {
    /// Expired at or after `exp`
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

/// Freshly issued token pair
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair").finish_non_exhaustive()
    }
}

/// Which secret a token is signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl SigningKey {
    fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }
}

/// Token issuer
///
/// Pure: no I/O, the only inputs are the user, the secrets and the clock.
pub struct TokenIssuer {
    access: SigningKey,
    refresh: SigningKey,
    validation: Validation,
}

impl TokenIssuer {
    /// Create an issuer from validated configuration
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            access: SigningKey::new(config.access_secret(), config.access_ttl),
            refresh: SigningKey::new(config.refresh_secret(), config.refresh_ttl),
            validation,
        }
    }

    /// Issue an access/refresh pair for a user
    pub fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        self.issue_pair_at(user_id, Utc::now().timestamp())
    }

    /// Issue a pair as if the clock read `now`
    pub fn issue_pair_at(&self, user_id: UserId, now: i64) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.sign(TokenKind::Access, user_id, now)?,
            refresh_token: self.sign(TokenKind::Refresh, user_id, now)?,
        })
    }

    /// Issue only an access token
    pub fn issue_access(&self, user_id: UserId) -> Result<String, AuthError> {
        self.sign(TokenKind::Access, user_id, Utc::now().timestamp())
    }

    /// Verify an access token against the current time
    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(TokenKind::Access, token, Utc::now().timestamp())
    }

    /// Verify a refresh token against the current time
    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(TokenKind::Refresh, token, Utc::now().timestamp())
    }

    /// Sign a token of the given kind issued at `now`
    pub fn sign(&self, kind: TokenKind, user_id: UserId, now: i64) -> Result<String, AuthError> {
        let key = self.key(kind);
        let claims = TokenClaims {
            user_id,
            iat: now,
            exp: now.saturating_add(key.ttl_secs),
            jti: Uuid::new_v4(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &key.encoding).map_err(|e| {
            tracing::error!(kind = kind.as_str(), error = %e, "Failed to sign token");
            AuthError::Internal("failed to sign token".to_string())
        })
    }

    /// Verify signature and claims, treating `now >= exp` as expired
    pub fn verify_at(
        &self,
        kind: TokenKind,
        token: &str,
        now: i64,
    ) -> Result<TokenClaims, AuthError> {
        let data = decode::<TokenClaims>(token, &self.key(kind).decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(kind = kind.as_str(), error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;

        let claims = data.claims;
        if claims.is_expired_at(now) {
            tracing::debug!(kind = kind.as_str(), exp = claims.exp, now, "Token expired");
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    fn key(&self, kind: TokenKind) -> &SigningKey {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl_secs", &self.access.ttl_secs)
            .field("refresh_ttl_secs", &self.refresh.ttl_secs)
            .finish_non_exhaustive()
    }
}
