//! Bazaar DB - Storage abstractions
//!
//! SQLx-based document access for users, products and coupons, plus the
//! Redis-backed key-value cache that holds refresh tokens and cached
//! catalog listings.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_db::{create_pool, RedisCache, Repositories};
//!
//! let pool = create_pool("postgres://localhost/bazaar").await?;
//! let repos = Repositories::new(pool);
//! let cache = RedisCache::connect("redis://127.0.0.1:6379").await?;
//!
//! let user = repos.users.find_by_email("user@example.com").await?;
//! ```

pub mod cache;
pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use cache::RedisCache;
pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repo::*;
