//! User coupons.
//!
//! A coupon instance belongs to exactly one user and usage is a one-way
//! transition: once `is_used` flips to true it never flips back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::UserId;

/// Shared coupon template (discount metadata).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponType {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Flat discount in KRW.
    pub discount_amount: i64,
    /// Marketing copy.
    pub description: Option<String>,
}

/// A coupon instance issued to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCoupon {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: UserId,
    /// Coupon template.
    pub coupon_type_id: Uuid,
    /// Redemption code.
    pub code: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Whether the coupon has been redeemed.
    pub is_used: bool,
    /// Issue timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserCoupon {
    /// A coupon is redeemable while unused and unexpired.
    #[must_use]
    pub fn redeemable(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && now <= self.expires_at
    }
}

/// A user coupon joined with its template metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnedCoupon {
    /// The coupon instance.
    #[serde(flatten)]
    pub coupon: UserCoupon,
    /// Template metadata for display.
    pub coupon_type: CouponType,
}
