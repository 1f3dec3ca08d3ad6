//! Mock repositories for testing

use async_trait::async_trait;
use bazaar_auth_core::{hash_password, AuthConfig};
use bazaar_db::{
    CreateUser, DbError, DbResult, KeyValueCache, UserProfileRow, UserRepository, UserRow,
};
use bazaar_types::{CartChange, CartItem};
use chrono::Utc;
use dashmap::DashMap;
use sqlx::types::Json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Auth config with fixed test secrets
#[allow(dead_code)]
pub fn test_config() -> AuthConfig {
    AuthConfig::try_new(
        "integration-access-secret-0123456789abcdef",
        "integration-refresh-secret-0123456789abcdef",
    )
    .expect("test secrets are valid")
}

/// In-memory user repository for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test user directly
    pub fn insert_user(&self, user: UserRow) {
        self.by_email.insert(user.email.clone(), user.id);
        self.users.insert(user.id, user);
    }

    /// Remove a user, leaving any issued tokens dangling
    #[allow(dead_code)]
    pub fn remove_user(&self, id: Uuid) {
        if let Some((_, user)) = self.users.remove(&id) {
            self.by_email.remove(&user.email);
        }
    }

    /// Stored row for an email
    #[allow(dead_code)]
    pub fn get_by_email(&self, email: &str) -> Option<UserRow> {
        self.by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone()))
    }

    /// Create a test user with a hashed password
    #[allow(dead_code)]
    pub async fn create_test_user(email: &str, password: &str, role: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).await.expect("hashing succeeds"),
            role: role.to_string(),
            cart_items: Json(Vec::<CartItem>::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_profile_by_id(&self, id: Uuid) -> DbResult<Option<UserProfileRow>> {
        Ok(self.users.get(&id).map(|r| {
            let user = r.value();
            UserProfileRow {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role.clone(),
                cart_items: user.cart_items.clone(),
            }
        }))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self.get_by_email(email))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        if self.by_email.contains_key(&user.email) {
            return Err(DbError::Conflict("users_email_key".to_string()));
        }
        let row = UserRow {
            id: user.id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role.as_str().to_string(),
            cart_items: Json(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.insert_user(row.clone());
        Ok(row)
    }

    async fn change_cart(
        &self,
        id: Uuid,
        change: CartChange,
    ) -> DbResult<Option<Vec<CartItem>>> {
        let mut user = self.users.get_mut(&id).ok_or(DbError::NotFound)?;
        if !change.apply(&mut user.cart_items.0) {
            return Ok(None);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.cart_items.0.clone()))
    }
}

/// In-memory key-value cache for testing
#[derive(Default, Clone)]
pub struct MockCache {
    entries: Arc<DashMap<String, String>>,
    ttls: Arc<DashMap<String, Option<Duration>>>,
    offline: Arc<AtomicBool>,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail
    #[allow(dead_code)]
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Raw stored value
    #[allow(dead_code)]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    /// TTL passed with the last write of `key`
    #[allow(dead_code)]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.ttls.get(key).and_then(|v| *v.value())
    }

    fn check_online(&self) -> DbResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DbError::Redis(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "connection refused",
            ))));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueCache for MockCache {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.check_online()?;
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> DbResult<()> {
        self.check_online()?;
        self.entries.insert(key.to_string(), value.to_string());
        self.ttls.insert(key.to_string(), ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> DbResult<()> {
        self.check_online()?;
        self.entries.remove(key);
        self.ttls.remove(key);
        Ok(())
    }
}
