//! Application state

use std::ops::Deref;
use std::sync::Arc;

use bazaar_auth_core::AuthService;
use bazaar_axum::CookiePolicy;
use bazaar_db::pg::{PgUserRepository, Repositories};
use bazaar_db::{DbPool, KeyValueCache, RedisCache, UserRepository};

use crate::config::Config;

/// Type alias for the auth service with concrete storage types
pub type AuthServiceImpl = AuthService<PgUserRepository, RedisCache>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// State for the auth endpoints, generic over storage
pub struct AuthState<U: UserRepository, C: KeyValueCache> {
    pub auth: Arc<AuthService<U, C>>,
    pub cookies: CookiePolicy,
}

impl<U: UserRepository, C: KeyValueCache> AuthState<U, C> {
    pub fn new(auth: Arc<AuthService<U, C>>) -> Self {
        let cookies = CookiePolicy::from_config(auth.config());
        Self { auth, cookies }
    }
}

impl<U: UserRepository, C: KeyValueCache> Clone for AuthState<U, C> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            cookies: self.cookies,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service for signup, login, sessions and identity resolution
    pub auth: Arc<AuthServiceImpl>,
    /// Database repositories
    pub repos: Repositories,
    /// Key-value cache (refresh tokens, featured products)
    pub cache: Arc<RedisCache>,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(repos: Repositories, cache: RedisCache, pool: DbPool, config: Config) -> Self {
        let cache = Arc::new(cache);
        let auth = AuthService::new(
            config.auth.clone(),
            Arc::new(repos.users.clone()),
            Arc::clone(&cache),
        );

        Self {
            auth: Arc::new(auth),
            repos,
            cache,
            pool: SharedPool(Arc::new(pool)),
            config: Arc::new(config),
        }
    }

    /// State for the auth router
    pub fn auth_state(&self) -> AuthState<PgUserRepository, RedisCache> {
        AuthState::new(Arc::clone(&self.auth))
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}
