//! PostgreSQL product repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::ProductRow;
use crate::repo::{CreateProduct, ProductRepository};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image, category, is_featured, created_at, updated_at";

/// PostgreSQL product repository
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> DbResult<Vec<ProductRow>> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_featured(&self) -> DbResult<Vec<ProductRow>> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_featured ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_by_category(&self, category: &str) -> DbResult<Vec<ProductRow>> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DbResult<Vec<ProductRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn sample(&self, limit: i64) -> DbResult<Vec<ProductRow>> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY random() LIMIT $1");
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProductRow>> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn create(&self, product: CreateProduct) -> DbResult<ProductRow> {
        let query = format!(
            r#"
            INSERT INTO products (id, name, description, price, image, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.image)
            .bind(&product.category)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_featured(&self, id: Uuid) -> DbResult<Option<ProductRow>> {
        let query = format!(
            r#"
            UPDATE products
            SET is_featured = NOT is_featured, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
