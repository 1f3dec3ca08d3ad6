//! Auth service - ties together token issuance, the session registry and
//! the credential store

use bazaar_db::{CreateUser, DbError, KeyValueCache, UserRepository};
use bazaar_types::{PublicUser, Role, UserId};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::{
    config::AuthConfig,
    crypto::{hash_password, verify_password},
    session::SessionRegistry,
    token::{TokenIssuer, TokenPair},
    AuthError,
};

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Password behind the hash verified for unknown emails
const DUMMY_PASSWORD: &str = "bazaar-unknown-account";

/// Signup input
#[derive(Clone)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Signup {
    /// Trim and lower-case fields, rejecting anything unusable
    fn validated(self) -> Result<Self, AuthError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AuthError::Validation("name is required".to_string()));
        }

        let email = normalize_email(&self.email);
        if !is_plausible_email(&email) {
            return Err(AuthError::Validation("email is invalid".to_string()));
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        Ok(Self {
            name,
            email,
            password: self.password,
        })
    }
}

impl std::fmt::Debug for Signup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signup")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Result of a successful signup or login
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// Public user fields (no password hash)
    pub user: PublicUser,
    /// Tokens to hand to the client
    pub tokens: TokenPair,
}

/// Authentication service
///
/// Provides unified interface for:
/// - Signup and login (credential checks, token pair issuance)
/// - Logout and access-token refresh (session registry)
/// - Request-time identity resolution from an access token
pub struct AuthService<U: UserRepository, C: KeyValueCache> {
    config: AuthConfig,
    issuer: TokenIssuer,
    sessions: SessionRegistry<C>,
    users: Arc<U>,
    /// Verified against when the email is unknown, so both login failures
    /// cost one Argon2 verification
    dummy_hash: OnceCell<String>,
}

impl<U: UserRepository, C: KeyValueCache> AuthService<U, C> {
    /// Create a new auth service
    pub fn new(config: AuthConfig, users: Arc<U>, cache: Arc<C>) -> Self {
        Self {
            issuer: TokenIssuer::new(&config),
            sessions: SessionRegistry::new(cache, config.refresh_ttl),
            users,
            config,
            dummy_hash: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn sessions(&self) -> &SessionRegistry<C> {
        &self.sessions
    }

    // =========================================================================
    // Signup / Login
    // =========================================================================

    /// Create an account and start its session
    pub async fn signup(&self, input: Signup) -> Result<AuthOutcome, AuthError> {
        let input = input.validated()?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            tracing::debug!(email = %input.email, "Signup rejected: email taken");
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&input.password).await?;
        let new_user = CreateUser {
            id: UserId::new().0,
            name: input.name,
            email: input.email,
            password_hash,
            role: Role::Customer,
        };

        // Two concurrent signups can both pass the lookup above.
        let row = match self.users.create(new_user).await {
            Ok(row) => row,
            Err(DbError::Conflict(_)) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        };

        let user = row.into_public();
        let tokens = self.start_session(user.id).await?;

        metrics::counter!("auth_signups_total").increment(1);
        tracing::info!(user_id = %user.id, "User signed up");

        Ok(AuthOutcome { user, tokens })
    }

    /// Check credentials and start a new session, superseding any previous one
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let email = normalize_email(email);

        let found = self.users.find_by_email(&email).await?;
        let stored_hash = match &found {
            Some(row) => row.password_hash.as_str(),
            None => self.dummy_hash().await?,
        };
        let verified = verify_password(password, stored_hash).await?;

        let row = match found {
            Some(row) if verified => row,
            _ => {
                metrics::counter!("auth_logins_total", "outcome" => "invalid").increment(1);
                tracing::debug!("Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let user = row.into_public();
        let tokens = self.start_session(user.id).await?;

        metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthOutcome { user, tokens })
    }

    async fn dummy_hash(&self) -> Result<&str, AuthError> {
        self.dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD))
            .await
            .map(String::as_str)
    }

    async fn start_session(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let tokens = self.issuer.issue_pair(user_id)?;
        self.sessions.store(&user_id, &tokens.refresh_token).await?;
        Ok(tokens)
    }

    // =========================================================================
    // Logout / Refresh
    // =========================================================================

    /// End the session named by `refresh_token`, if any
    ///
    /// A missing or undecodable token is not an error; there is simply
    /// nothing to invalidate.
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        metrics::counter!("auth_logouts_total").increment(1);

        let Some(token) = refresh_token.filter(|t| !t.is_empty()) else {
            tracing::debug!("Logout without refresh token");
            return Ok(());
        };

        match self.issuer.verify_refresh(token) {
            Ok(claims) => {
                self.sessions.invalidate(&claims.user_id).await?;
                tracing::info!(user_id = %claims.user_id, "User logged out");
            }
            Err(e) => tracing::debug!(error = %e, "Logout with unusable refresh token"),
        }

        Ok(())
    }

    /// Mint a new access token from the stored refresh token
    ///
    /// The refresh token itself is not rotated.
    pub async fn refresh_access_token(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<String, AuthError> {
        let result = self.try_refresh(refresh_token).await;
        let outcome = if result.is_ok() { "success" } else { "rejected" };
        metrics::counter!("auth_refreshes_total", "outcome" => outcome).increment(1);
        result
    }

    async fn try_refresh(&self, refresh_token: Option<&str>) -> Result<String, AuthError> {
        let token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.issuer.verify_refresh(token)?;

        if !self.sessions.validate(&claims.user_id, token).await? {
            return Err(AuthError::SessionRevoked);
        }

        let access_token = self.issuer.issue_access(claims.user_id)?;
        tracing::debug!(user_id = %claims.user_id, "Access token refreshed");
        Ok(access_token)
    }

    // =========================================================================
    // Identity Resolution
    // =========================================================================

    /// Resolve the user behind an access token
    pub async fn resolve_identity(
        &self,
        access_token: Option<&str>,
    ) -> Result<PublicUser, AuthError> {
        let token = access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.issuer.verify_access(token)?;

        let profile = self
            .users
            .find_profile_by_id(claims.user_id.0)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %claims.user_id, "Token for unknown user");
                AuthError::UserNotFound
            })?;

        Ok(profile.into())
    }
}

impl<U: UserRepository, C: KeyValueCache> std::fmt::Debug for AuthService<U, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
