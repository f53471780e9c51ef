//! Driving port for coupon use-cases.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, OwnedCoupon, UserId};

/// Domain use-case port for coupons.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponService: Send + Sync {
    /// List the user's coupons with template metadata.
    async fn list(&self, user_id: &UserId) -> Result<Vec<OwnedCoupon>, Error>;

    /// Redeem a coupon owned by the user.
    ///
    /// Fails with `Conflict` when the coupon is already used or expired.
    async fn redeem(&self, id: Uuid, user_id: &UserId) -> Result<(), Error>;
}
