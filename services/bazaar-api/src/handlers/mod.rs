//! HTTP handlers

mod auth;
mod cart;
mod coupon;
mod health;
mod product;

pub use auth::{auth_router, LoginRequest, SignupRequest, UserResponse};
pub use cart::{add_to_cart, get_cart_products, remove_from_cart, update_quantity};
pub use coupon::{get_coupon, validate_coupon};
pub use health::{health, ready};
pub use product::{
    create_product, delete_product, featured_products, list_products, products_by_category,
    recommended_products, toggle_featured,
};
