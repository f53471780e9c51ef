//! Coupon use-case service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use super::error::Error;
use super::identity::UserId;
use super::coupon::OwnedCoupon;
use super::ports::{CouponRepository, CouponRepositoryError, CouponService};

/// Coupon service implementing the [`CouponService`] port.
#[derive(Clone)]
pub struct CouponServiceImpl {
    repository: Arc<dyn CouponRepository>,
    clock: Arc<dyn Clock>,
}

fn map_error(error: CouponRepositoryError) -> Error {
    match error {
        CouponRepositoryError::Connection { message } => Error::service_unavailable(message),
        CouponRepositoryError::Query { message } => Error::internal(message),
    }
}

impl CouponServiceImpl {
    /// Create the service with its repository and clock.
    #[must_use]
    pub fn new(repository: Arc<dyn CouponRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl CouponService for CouponServiceImpl {
    async fn list(&self, user_id: &UserId) -> Result<Vec<OwnedCoupon>, Error> {
        self.repository
            .list_for_user(user_id)
            .await
            .map_err(map_error)
    }

    async fn redeem(&self, id: Uuid, user_id: &UserId) -> Result<(), Error> {
        let coupon = self
            .repository
            .find_for_user(id, user_id)
            .await
            .map_err(map_error)?
            .ok_or_else(|| Error::not_found("coupon not found"))?;
        if !coupon.redeemable(self.clock.utc()) {
            return Err(Error::conflict("coupon already used or expired"));
        }
        let updated = self
            .repository
            .mark_used(id, user_id)
            .await
            .map_err(map_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found("coupon not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{TimeDelta, Utc};
    use mockable::DefaultClock;

    use super::*;
    use crate::domain::ports::MockCouponRepository;
    use crate::domain::{ErrorCode, UserCoupon};

    fn coupon(is_used: bool, expires_in: TimeDelta) -> UserCoupon {
        UserCoupon {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            coupon_type_id: Uuid::new_v4(),
            code: "WELCOME".into(),
            expires_at: Utc::now() + expires_in,
            is_used,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn redeem_flips_a_live_coupon() {
        let live = coupon(false, TimeDelta::days(7));
        let mut repo = MockCouponRepository::new();
        let found = live.clone();
        repo.expect_find_for_user()
            .returning(move |_, _| Ok(Some(found.clone())));
        repo.expect_mark_used().times(1).returning(|_, _| Ok(true));
        let service = CouponServiceImpl::new(Arc::new(repo), Arc::new(DefaultClock));
        service
            .redeem(live.id, &live.user_id)
            .await
            .expect("redeem succeeds");
    }

    #[tokio::test]
    async fn used_coupons_conflict() {
        let used = coupon(true, TimeDelta::days(7));
        let mut repo = MockCouponRepository::new();
        let found = used.clone();
        repo.expect_find_for_user()
            .returning(move |_, _| Ok(Some(found.clone())));
        let service = CouponServiceImpl::new(Arc::new(repo), Arc::new(DefaultClock));
        let err = service
            .redeem(used.id, &used.user_id)
            .await
            .expect_err("used coupon rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn expired_coupons_conflict() {
        let expired = coupon(false, TimeDelta::days(-1));
        let mut repo = MockCouponRepository::new();
        let found = expired.clone();
        repo.expect_find_for_user()
            .returning(move |_, _| Ok(Some(found.clone())));
        let service = CouponServiceImpl::new(Arc::new(repo), Arc::new(DefaultClock));
        let err = service
            .redeem(expired.id, &expired.user_id)
            .await
            .expect_err("expired coupon rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}
