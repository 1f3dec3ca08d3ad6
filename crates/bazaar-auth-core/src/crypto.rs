//! Cryptographic utilities for secure operations
//!
//! Password hashing and constant-time comparison. Both are on the login and
//! refresh paths, where a timing side channel would leak secrets.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::AuthError;

/// Constant-time byte slice comparison.
///
/// This function compares two byte slices in constant time to prevent
/// timing attacks. The comparison time depends only on the length of
/// the slices, not on their contents.
///
/// # Security
/// - Returns `false` immediately if lengths differ (length is not secret)
/// - Compares all bytes even after finding a difference
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let result = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    result == 0
}

/// Hash a password with Argon2id and a random salt.
///
/// Returns the PHC string (`$argon2id$v=19$...`), which embeds the salt and
/// parameters needed for verification. Runs on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing task failed");
            AuthError::Internal("password hashing task failed".to_string())
        })?
}

/// Verify a password against a stored PHC hash on the blocking pool.
///
/// A malformed stored hash verifies as `false`.
pub async fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let password = password.to_owned();
    let stored_hash = stored_hash.to_owned();
    tokio::task::spawn_blocking(move || verify_blocking(&password, &stored_hash))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            AuthError::Internal("password verification task failed".to_string())
        })
}

fn hash_blocking(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AuthError::Internal("failed to hash password".to_string())
        })
}

fn verify_blocking(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc123", b"abc123"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(!constant_time_eq(b"abc123", b"abc124"));
        assert!(constant_time_eq(b"", b""));
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("hunter22").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).await.unwrap());
        assert!(!verify_password("hunter23", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_different_salts() {
        let a = hash_password("password").await.unwrap();
        let b = hash_password("password").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_false() {
        assert!(!verify_password("anything", "not-a-phc-string").await.unwrap());
        assert!(!verify_password("anything", "").await.unwrap());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_leaves_the_runtime_responsive() {
        use std::time::{Duration, Instant};

        let hash = hash_password("hunter22").await.unwrap();

        let started = Instant::now();
        let ticker = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            started.elapsed()
        });
        let verify = tokio::spawn(async move {
            let verified = verify_password("hunter22", &hash).await;
            (verified, started.elapsed())
        });

        let (ticked_after, verify) = tokio::join!(ticker, verify);
        let (verified, verified_after) = verify.unwrap();

        assert!(verified.unwrap());
        // The timer fires while Argon2 is still running off-runtime.
        assert!(ticked_after.unwrap() < verified_after);
    }
}
