//! PostgreSQL coupon repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::CouponRow;
use crate::repo::CouponRepository;

/// PostgreSQL coupon repository
#[derive(Clone)]
pub struct PgCouponRepository {
    pool: PgPool,
}

impl PgCouponRepository {
    /// Create a new coupon repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponRepository for PgCouponRepository {
    async fn find_active_for_user(&self, user_id: Uuid) -> DbResult<Option<CouponRow>> {
        let coupon = sqlx::query_as::<_, CouponRow>(
            r#"
            SELECT id, code, discount, expiration_date, is_active, user_id,
                   created_at, updated_at
            FROM coupons
            WHERE user_id = $1 AND is_active
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    async fn find_by_code(&self, code: &str) -> DbResult<Option<CouponRow>> {
        let coupon = sqlx::query_as::<_, CouponRow>(
            r#"
            SELECT id, code, discount, expiration_date, is_active, user_id,
                   created_at, updated_at
            FROM coupons
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    async fn deactivate(&self, id: Uuid) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE coupons
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
