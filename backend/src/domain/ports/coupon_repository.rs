//! Port abstraction for user coupon persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{OwnedCoupon, UserCoupon, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by coupon adapters.
    pub enum CouponRepositoryError {
        /// Repository connection could not be established.
        Connection => "coupon repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "coupon repository query failed: {message}",
    }
}

/// Port for coupon persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// List a user's coupons joined with template metadata, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OwnedCoupon>, CouponRepositoryError>;

    /// Fetch one coupon scoped to its owner.
    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<UserCoupon>, CouponRepositoryError>;

    /// Flip `is_used` to true, scoped to the owner.
    ///
    /// Returns whether a row was updated. The transition is one-way; there
    /// is no un-redeem.
    async fn mark_used(&self, id: Uuid, user_id: &UserId) -> Result<bool, CouponRepositoryError>;
}
