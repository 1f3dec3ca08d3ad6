//! Discount coupon types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::UserId;

/// Unique coupon identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponId(pub Uuid);

impl std::fmt::Display for CouponId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CouponId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Discount coupon owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    /// Percentage off, 0..=100
    pub discount: u8,
    pub expiration_date: DateTime<Utc>,
    pub is_active: bool,
    pub user_id: UserId,
}

impl Coupon {
    /// Check whether the coupon has passed its expiration date
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date < now
    }
}
