//! PostgreSQL-backed `CouponRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CouponRepository, CouponRepositoryError};
use crate::domain::{CouponType, OwnedCoupon, UserCoupon, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CouponTypeRow, UserCouponRow};
use super::pool::{DbPool, PoolError};
use super::schema::{coupon_types, user_coupons};

/// Diesel-backed implementation of the coupon repository port.
#[derive(Clone)]
pub struct DieselCouponRepository {
    pool: DbPool,
}

impl DieselCouponRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CouponRepositoryError {
    map_pool_error(error, CouponRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> CouponRepositoryError {
    map_diesel_error(
        error,
        CouponRepositoryError::query,
        CouponRepositoryError::connection,
    )
}

#[async_trait]
impl CouponRepository for DieselCouponRepository {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OwnedCoupon>, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<(UserCouponRow, CouponTypeRow)> = user_coupons::table
            .inner_join(coupon_types::table)
            .filter(user_coupons::user_id.eq(user_id.as_uuid()))
            .order(user_coupons::created_at.desc())
            .select((UserCouponRow::as_select(), CouponTypeRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(rows
            .into_iter()
            .map(|(coupon, coupon_type)| OwnedCoupon {
                coupon: UserCoupon::from(coupon),
                coupon_type: CouponType::from(coupon_type),
            })
            .collect())
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<UserCoupon>, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = user_coupons::table
            .filter(
                user_coupons::id
                    .eq(id)
                    .and(user_coupons::user_id.eq(user_id.as_uuid())),
            )
            .select(UserCouponRow::as_select())
            .first::<UserCouponRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        Ok(row.map(UserCoupon::from))
    }

    async fn mark_used(&self, id: Uuid, user_id: &UserId) -> Result<bool, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        // The is_used filter keeps the transition one-way even under races.
        let updated = diesel::update(
            user_coupons::table.filter(
                user_coupons::id
                    .eq(id)
                    .and(user_coupons::user_id.eq(user_id.as_uuid()))
                    .and(user_coupons::is_used.eq(false)),
            ),
        )
        .set(user_coupons::is_used.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_db)?;
        Ok(updated > 0)
    }
}
