//! Configuration types for auth service

use std::time::Duration;

use crate::AuthError;

/// Access token lifetime
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Refresh token lifetime
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Auth service configuration
///
/// Built once at startup and handed to [`crate::AuthService::new`].
#[derive(Clone)]
pub struct AuthConfig {
    access_secret: String,
    refresh_secret: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime, also the session cache TTL
    pub refresh_ttl: Duration,
    /// Whether cookies carry the `Secure` attribute
    pub secure_cookies: bool,
}

impl AuthConfig {
    /// Minimum allowed secret length in bytes (256 bits)
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a new auth config
    ///
    /// # Errors
    /// Returns `AuthError::Configuration` if either secret is shorter than
    /// [`Self::MIN_SECRET_LENGTH`] or both secrets are the same.
    pub fn try_new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();

        for (name, secret) in [("access", &access_secret), ("refresh", &refresh_secret)] {
            if secret.len() < Self::MIN_SECRET_LENGTH {
                return Err(AuthError::Configuration(format!(
                    "{name} token secret too short: got {} bytes, need at least {}",
                    secret.len(),
                    Self::MIN_SECRET_LENGTH
                )));
            }
        }
        if access_secret == refresh_secret {
            return Err(AuthError::Configuration(
                "access and refresh token secrets must differ".to_string(),
            ));
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl: ACCESS_TOKEN_TTL,
            refresh_ttl: REFRESH_TOKEN_TTL,
            secure_cookies: false,
        })
    }

    /// Set the cookie `Secure` attribute
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    pub(crate) fn access_secret(&self) -> &[u8] {
        self.access_secret.as_bytes()
    }

    pub(crate) fn refresh_secret(&self) -> &[u8] {
        self.refresh_secret.as_bytes()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}
