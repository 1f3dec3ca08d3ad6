//! Coupon handlers

use axum::extract::State;
use axum::Json;
use bazaar_axum::RequireAuth;
use bazaar_db::CouponRepository;
use bazaar_types::Coupon;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateCouponRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateCouponResponse {
    pub message: &'static str,
    pub code: String,
    pub discount: u8,
}

/// GET /api/coupons
///
/// The caller's active coupon, or `null`.
pub async fn get_coupon(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> ApiResult<Json<Option<Coupon>>> {
    let coupon = state.repos.coupons.find_active_for_user(user.id.0).await?;
    Ok(Json(coupon.map(Coupon::from)))
}

/// POST /api/coupons/validate
///
/// Expired coupons are deactivated on first sight.
pub async fn validate_coupon(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<ValidateCouponRequest>,
) -> ApiResult<Json<ValidateCouponResponse>> {
    let coupon: Coupon = state
        .repos
        .coupons
        .find_by_code(req.code.trim())
        .await?
        .ok_or(ApiError::NotFound("Coupon not found"))?
        .into();

    if coupon.is_expired_at(Utc::now()) {
        state.repos.coupons.deactivate(coupon.id.0).await?;
        tracing::info!(coupon_id = %coupon.id, user_id = %user.id, "Expired coupon deactivated");
        return Err(ApiError::NotFound("Coupon expired"));
    }

    Ok(Json(ValidateCouponResponse {
        message: "Coupon is valid",
        code: coupon.code,
        discount: coupon.discount,
    }))
}
