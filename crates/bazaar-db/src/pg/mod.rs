//! PostgreSQL repository implementations

mod coupon;
mod product;
mod user;

pub use coupon::PgCouponRepository;
pub use product::PgProductRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub products: PgProductRepository,
    pub coupons: PgCouponRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            products: PgProductRepository::new(pool.clone()),
            coupons: PgCouponRepository::new(pool),
        }
    }
}
