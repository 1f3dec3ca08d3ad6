//! PostgreSQL user repository implementation

use async_trait::async_trait;
use bazaar_types::{CartChange, CartItem};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::{UserProfileRow, UserRow};
use crate::repo::{CreateUser, UserRepository};

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_profile_by_id(&self, id: Uuid) -> DbResult<Option<UserProfileRow>> {
        let user = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT id, name, email, role, cart_items
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role, cart_items,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, cart_items,
                      created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn change_cart(
        &self,
        id: Uuid,
        change: CartChange,
    ) -> DbResult<Option<Vec<CartItem>>> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent edits of the same cart.
        let Json(mut items) = sqlx::query_scalar::<_, Json<Vec<CartItem>>>(
            r#"
            SELECT cart_items
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound)?;

        if !change.apply(&mut items) {
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE users
            SET cart_items = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(&items))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(items))
    }
}
