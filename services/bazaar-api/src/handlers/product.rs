//! Product catalog handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bazaar_axum::RequireAdmin;
use bazaar_db::{CreateProduct, DbError, KeyValueCache, ProductRepository};
use bazaar_types::{MessageResponse, Product, ProductId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// Cache key holding the featured product list
pub const FEATURED_CACHE_KEY: &str = "featured_products";

/// Number of products returned by the recommendations endpoint
const RECOMMENDATION_COUNT: i64 = 3;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
}

impl CreateProductRequest {
    fn into_create(self) -> Result<CreateProduct, ApiError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::BadRequest("name is required".to_string()));
        }
        let category = self.category.trim().to_lowercase();
        if category.is_empty() {
            return Err(ApiError::BadRequest("category is required".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ApiError::BadRequest(
                "price must be a non-negative number".to_string(),
            ));
        }

        Ok(CreateProduct {
            id: Uuid::new_v4(),
            name,
            description: self.description,
            price: self.price,
            image: self.image,
            category,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedResponse {
    pub featured_products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// Storefront projection used for recommendations
#[derive(Debug, Serialize)]
pub struct RecommendedProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
}

impl From<Product> for RecommendedProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            image: product.image,
            price: product.price,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/products (admin)
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<ProductsResponse>> {
    let products = state.repos.products.find_all().await?;
    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Product::from).collect(),
    }))
}

/// GET /api/products/featured
///
/// Served from the cache when present; a miss repopulates it.
pub async fn featured_products(
    State(state): State<AppState>,
) -> ApiResult<Json<FeaturedResponse>> {
    if let Some(cached) = state.cache.get(FEATURED_CACHE_KEY).await? {
        match serde_json::from_str::<Vec<Product>>(&cached) {
            Ok(featured_products) => return Ok(Json(FeaturedResponse { featured_products })),
            Err(e) => tracing::warn!(error = %e, "Discarding unreadable featured cache"),
        }
    }

    let featured_products = refresh_featured_cache(&state).await?;
    Ok(Json(FeaturedResponse { featured_products }))
}

/// GET /api/products/recommendations
pub async fn recommended_products(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RecommendedProduct>>> {
    let sample = state.repos.products.sample(RECOMMENDATION_COUNT).await?;
    Ok(Json(
        sample
            .into_iter()
            .map(|row| RecommendedProduct::from(Product::from(row)))
            .collect(),
    ))
}

/// GET /api/products/category/{category}
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<ProductsResponse>> {
    let products = state
        .repos
        .products
        .find_by_category(&category.to_lowercase())
        .await?;
    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Product::from).collect(),
    }))
}

/// POST /api/products (admin)
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let row = state.repos.products.create(req.into_create()?).await?;
    tracing::info!(product_id = %row.id, admin_id = %admin.id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            product: row.into(),
        }),
    ))
}

/// DELETE /api/products/{id} (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let product = state
        .repos
        .products
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Product not found"))?;

    if !state.repos.products.delete(id).await? {
        return Err(ApiError::NotFound("Product not found"));
    }
    tracing::info!(product_id = %id, "Product deleted");

    if product.is_featured {
        refresh_featured_cache(&state).await?;
    }

    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// PATCH /api/products/{id} (admin)
pub async fn toggle_featured(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Product>> {
    let row = state
        .repos
        .products
        .toggle_featured(id)
        .await?
        .ok_or(ApiError::NotFound("Product not found"))?;
    tracing::info!(product_id = %id, is_featured = row.is_featured, "Featured flag toggled");

    refresh_featured_cache(&state).await?;
    Ok(Json(row.into()))
}

/// Reload featured products from the database into the cache
async fn refresh_featured_cache(state: &AppState) -> ApiResult<Vec<Product>> {
    let featured: Vec<Product> = state
        .repos
        .products
        .find_featured()
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let encoded = serde_json::to_string(&featured).map_err(DbError::from)?;
    state.cache.set(FEATURED_CACHE_KEY, &encoded, None).await?;

    Ok(featured)
}
