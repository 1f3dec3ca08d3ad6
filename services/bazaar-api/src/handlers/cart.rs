//! Cart handlers
//!
//! The cart lives on the user record; every mutation is one locked
//! read-modify-write of that list.

use axum::extract::{Path, State};
use axum::Json;
use bazaar_axum::RequireAuth;
use bazaar_db::{DbError, ProductRepository, UserRepository};
use bazaar_types::{CartChange, CartItem, CartProduct, Product, ProductId, PublicUser};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: Option<ProductId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemsResponse {
    pub cart_items: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProductsResponse {
    pub cart_items: Vec<CartProduct>,
}

// ============================================================================
// Cart contents
// ============================================================================

/// Pair loaded products with the quantities held in the cart
fn join_cart(user: &PublicUser, products: Vec<Product>) -> Vec<CartProduct> {
    products
        .into_iter()
        .filter_map(|product| {
            let quantity = user.cart_item(product.id)?.quantity;
            Some(CartProduct { product, quantity })
        })
        .collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/cart
pub async fn get_cart_products(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> ApiResult<Json<CartProductsResponse>> {
    let ids: Vec<Uuid> = user.cart_items.iter().map(|item| item.product_id.0).collect();
    let products = state
        .repos
        .products
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(Json(CartProductsResponse {
        cart_items: join_cart(&user, products),
    }))
}

/// POST /api/cart
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<AddToCartRequest>,
) -> ApiResult<Json<CartItemsResponse>> {
    let cart_items = change_cart(&state, &user, CartChange::Add(req.product_id))
        .await?
        .unwrap_or_default();

    Ok(Json(CartItemsResponse { cart_items }))
}

/// DELETE /api/cart
///
/// An empty body clears the cart.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    req: Option<ApiJson<RemoveFromCartRequest>>,
) -> ApiResult<Json<CartItemsResponse>> {
    let product_id = req.and_then(|ApiJson(body)| body.product_id);
    let cart_items = change_cart(&state, &user, CartChange::Remove(product_id))
        .await?
        .unwrap_or_default();

    Ok(Json(CartItemsResponse { cart_items }))
}

/// PUT /api/cart/{id}
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
    ApiJson(req): ApiJson<UpdateQuantityRequest>,
) -> ApiResult<Json<Vec<CartItem>>> {
    let change = CartChange::SetQuantity(product_id, req.quantity);
    let cart_items = change_cart(&state, &user, change)
        .await?
        .ok_or(ApiError::NotFound("Product not found"))?;

    Ok(Json(cart_items))
}

/// Apply a change to the stored cart, not to the snapshot loaded with the
/// caller's identity
async fn change_cart(
    state: &AppState,
    user: &PublicUser,
    change: CartChange,
) -> ApiResult<Option<Vec<CartItem>>> {
    let items = state
        .repos
        .users
        .change_cart(user.id.0, change)
        .await
        .map_err(|e| match e {
            DbError::NotFound => ApiError::NotFound("User not found"),
            other => other.into(),
        })?;

    if let Some(items) = &items {
        tracing::debug!(user_id = %user.id, lines = items.len(), "Cart updated");
    }
    Ok(items)
}
