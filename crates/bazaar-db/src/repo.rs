//! Repository traits
//!
//! Define async storage interfaces for users, products, coupons and the
//! key-value cache.

use std::time::Duration;

use async_trait::async_trait;
use bazaar_types::{CartChange, CartItem, Role};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID without loading the password hash
    async fn find_profile_by_id(&self, id: Uuid) -> DbResult<Option<UserProfileRow>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Apply `change` to the stored cart as one atomic read-modify-write.
    ///
    /// Returns the resulting cart, or `None` when the change did not apply
    /// and nothing was written. Fails with `NotFound` for an unknown user.
    async fn change_cart(&self, id: Uuid, change: CartChange)
        -> DbResult<Option<Vec<CartItem>>>;
}

/// Create user input
///
/// `password_hash` must already be a one-way hash.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Product repository trait
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List every product
    async fn find_all(&self) -> DbResult<Vec<ProductRow>>;

    /// List featured products
    async fn find_featured(&self) -> DbResult<Vec<ProductRow>>;

    /// List products in a category
    async fn find_by_category(&self, category: &str) -> DbResult<Vec<ProductRow>>;

    /// Load the products with the given IDs
    async fn find_by_ids(&self, ids: &[Uuid]) -> DbResult<Vec<ProductRow>>;

    /// Random sample of products
    async fn sample(&self, limit: i64) -> DbResult<Vec<ProductRow>>;

    /// Find a product by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProductRow>>;

    /// Create a new product
    async fn create(&self, product: CreateProduct) -> DbResult<ProductRow>;

    /// Delete a product, returning whether it existed
    async fn delete(&self, id: Uuid) -> DbResult<bool>;

    /// Flip the featured flag, returning the updated row
    async fn toggle_featured(&self, id: Uuid) -> DbResult<Option<ProductRow>>;
}

/// Create product input
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
}

/// Coupon repository trait
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Find the active coupon owned by a user
    async fn find_active_for_user(&self, user_id: Uuid) -> DbResult<Option<CouponRow>>;

    /// Find a coupon by code
    async fn find_by_code(&self, code: &str) -> DbResult<Option<CouponRow>>;

    /// Mark a coupon inactive
    async fn deactivate(&self, id: Uuid) -> DbResult<()>;
}

/// Remote key-value store
///
/// Every call is a single atomic remote operation; there is no retry.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Read a value
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Write a value, replacing any previous one. `None` means no expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> DbResult<()>;

    /// Remove a value. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> DbResult<()>;
}
