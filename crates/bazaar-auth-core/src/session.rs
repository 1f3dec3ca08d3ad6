//! Refresh-token session registry
//!
//! Tracks exactly one active refresh token per user in the key-value cache.
//! Storing a new token overwrites the previous one, which is how a second
//! login supersedes the first session.

use bazaar_db::KeyValueCache;
use bazaar_types::UserId;
use std::sync::Arc;
use std::time::Duration;

use crate::crypto::constant_time_eq;
use crate::AuthError;

/// Cache key prefix for stored refresh tokens
pub const REFRESH_KEY_PREFIX: &str = "refresh_token:";

/// Cache key holding a user's active refresh token
pub fn refresh_key(user_id: &UserId) -> String {
    format!("{REFRESH_KEY_PREFIX}{user_id}")
}

/// Session registry over a remote key-value cache
pub struct SessionRegistry<C: KeyValueCache> {
    cache: Arc<C>,
    ttl: Duration,
}

impl<C: KeyValueCache> SessionRegistry<C> {
    /// Create a registry whose entries expire after `ttl`
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Store the user's refresh token, replacing any previous one
    pub async fn store(&self, user_id: &UserId, refresh_token: &str) -> Result<(), AuthError> {
        self.cache
            .set(&refresh_key(user_id), refresh_token, Some(self.ttl))
            .await?;
        tracing::debug!(user_id = %user_id, "Stored refresh token");
        Ok(())
    }

    /// Check that `candidate` is the user's stored refresh token
    ///
    /// A missing entry or a mismatch is `Ok(false)`; only cache failures are
    /// errors.
    pub async fn validate(&self, user_id: &UserId, candidate: &str) -> Result<bool, AuthError> {
        let stored = self.cache.get(&refresh_key(user_id)).await?;
        let valid = stored.is_some_and(|stored| {
            constant_time_eq(stored.as_bytes(), candidate.as_bytes())
        });
        if !valid {
            tracing::debug!(user_id = %user_id, "Refresh token does not match stored session");
        }
        Ok(valid)
    }

    /// Remove the user's stored refresh token. Idempotent.
    pub async fn invalidate(&self, user_id: &UserId) -> Result<(), AuthError> {
        self.cache.delete(&refresh_key(user_id)).await?;
        tracing::debug!(user_id = %user_id, "Invalidated refresh token");
        Ok(())
    }
}

impl<C: KeyValueCache> std::fmt::Debug for SessionRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_key_format() {
        let user_id = UserId::parse("6f1c2a9e-3b4d-4e5f-8a9b-0c1d2e3f4a5b").unwrap();
        assert_eq!(
            refresh_key(&user_id),
            "refresh_token:6f1c2a9e-3b4d-4e5f-8a9b-0c1d2e3f4a5b"
        );
    }
}
