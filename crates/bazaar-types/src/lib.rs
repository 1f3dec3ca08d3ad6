//! Bazaar Types - Shared domain types
//!
//! This crate contains domain types used across Bazaar crates:
//! - User identity, roles and cart items
//! - Catalog products
//! - Discount coupons
//! - API error envelopes

pub mod api;
pub mod coupon;
pub mod error;
pub mod product;
pub mod user;

pub use api::*;
pub use coupon::*;
pub use error::*;
pub use product::*;
pub use user::*;
