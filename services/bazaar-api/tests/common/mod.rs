//! In-memory collaborators for driving the API routers

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bazaar_auth_core::AuthConfig;
use bazaar_db::{
    CreateUser, DbError, DbResult, KeyValueCache, UserProfileRow, UserRepository, UserRow,
};
use bazaar_types::{CartChange, CartItem};
use chrono::Utc;
use dashmap::DashMap;
use sqlx::types::Json;
use uuid::Uuid;

/// Auth config with fixed test secrets
#[allow(dead_code)]
pub fn test_config() -> AuthConfig {
    AuthConfig::try_new(
        "endpoint-access-secret-0123456789abcdef",
        "endpoint-refresh-secret-0123456789abcdef",
    )
    .expect("test secrets are valid")
}

/// In-memory user store keyed by id, with an email index
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored row for an email
    #[allow(dead_code)]
    pub fn get_by_email(&self, email: &str) -> Option<UserRow> {
        self.by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone()))
    }

    /// Number of stored users
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.users.len()
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
        self.by_email.insert(row.email.clone(), row.id);
        self.users.insert(row.id, row.clone());
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

/// In-memory key-value cache
#[derive(Default, Clone)]
pub struct MockCache {
    entries: Arc<DashMap<String, String>>,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value
    #[allow(dead_code)]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }
}

#[async_trait]
impl KeyValueCache for MockCache {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> DbResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> DbResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
