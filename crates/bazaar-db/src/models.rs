//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use bazaar_types::{
    CartItem, Coupon, CouponId, Product, ProductId, PublicUser, Role, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Full user row, including the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub cart_items: Json<Vec<CartItem>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User projection without the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserProfileRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub cart_items: Json<Vec<CartItem>>,
}

/// Product row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Coupon row from the database
#[derive(Debug, Clone, FromRow)]
pub struct CouponRow {
    pub id: Uuid,
    pub code: String,
    pub discount: i16,
    pub expiration_date: DateTime<Utc>,
    pub is_active: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unknown stored roles degrade to the least privileged one
fn parse_role(role: &str) -> Role {
    role.parse().unwrap_or_else(|_| {
        tracing::warn!(role, "Unknown role in user row, treating as customer");
        Role::Customer
    })
}

impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    pub fn role(&self) -> Role {
        parse_role(&self.role)
    }

    /// Drop the password hash and convert to the public shape
    pub fn into_public(self) -> PublicUser {
        let role = self.role();
        PublicUser {
            id: UserId(self.id),
            name: self.name,
            email: self.email,
            role,
            cart_items: self.cart_items.0,
        }
    }
}

impl From<UserProfileRow> for PublicUser {
    fn from(row: UserProfileRow) -> Self {
        Self {
            id: UserId(row.id),
            role: parse_role(&row.role),
            name: row.name,
            email: row.email,
            cart_items: row.cart_items.0,
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            category: row.category,
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Self {
            id: CouponId(row.id),
            code: row.code,
            discount: u8::try_from(row.discount.clamp(0, 100)).unwrap_or_default(),
            expiration_date: row.expiration_date,
            is_active: row.is_active,
            user_id: UserId(row.user_id),
        }
    }
}
