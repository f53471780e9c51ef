//! PostgreSQL-backed `ContentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContentRepository, ContentRepositoryError};
use crate::domain::{Banner, PaymentAccount};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BannerRow, PaymentAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::{banners, payment_bank_accounts};

/// Diesel-backed implementation of the content repository port.
#[derive(Clone)]
pub struct DieselContentRepository {
    pool: DbPool,
}

impl DieselContentRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ContentRepositoryError {
    map_pool_error(error, ContentRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> ContentRepositoryError {
    map_diesel_error(
        error,
        ContentRepositoryError::query,
        ContentRepositoryError::connection,
    )
}

#[async_trait]
impl ContentRepository for DieselContentRepository {
    async fn list_banners(&self) -> Result<Vec<Banner>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<BannerRow> = banners::table
            .filter(banners::is_active.eq(true))
            .order(banners::display_order.asc())
            .select(BannerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(rows.into_iter().map(Banner::from).collect())
    }

    async fn list_payment_accounts(
        &self,
    ) -> Result<Vec<PaymentAccount>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<PaymentAccountRow> = payment_bank_accounts::table
            .filter(payment_bank_accounts::is_active.eq(true))
            .select(PaymentAccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(rows.into_iter().map(PaymentAccount::from).collect())
    }
}
