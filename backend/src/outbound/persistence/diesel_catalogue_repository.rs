//! PostgreSQL-backed `CatalogueRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{KnifeType, KnifeTypeUpdate, NewKnifeType};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{KnifeTypeChangeset, KnifeTypeRow, NewKnifeTypeRow};
use super::pool::{DbPool, PoolError};
use super::schema::knife_types;

/// Diesel-backed implementation of the catalogue repository port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CatalogueRepositoryError {
    map_pool_error(error, CatalogueRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_diesel_error(
        error,
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_active(&self) -> Result<Vec<KnifeType>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<KnifeTypeRow> = knife_types::table
            .filter(knife_types::is_active.eq(true))
            .order((knife_types::display_order.asc(), knife_types::name.asc()))
            .select(KnifeTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(rows.into_iter().map(KnifeType::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<KnifeType>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<KnifeTypeRow> = knife_types::table
            .order((knife_types::display_order.asc(), knife_types::name.asc()))
            .select(KnifeTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(rows.into_iter().map(KnifeType::from).collect())
    }

    async fn find_active_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<KnifeType>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<KnifeTypeRow> = knife_types::table
            .filter(
                knife_types::id
                    .eq_any(ids)
                    .and(knife_types::is_active.eq(true)),
            )
            .select(KnifeTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(rows.into_iter().map(KnifeType::from).collect())
    }

    async fn insert(&self, entry: NewKnifeType) -> Result<KnifeType, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_row = NewKnifeTypeRow {
            id: Uuid::new_v4(),
            name: &entry.name,
            market_price: entry.market_price,
            discount_price: entry.discount_price,
            image_url: entry.image_url.as_deref(),
            is_active: true,
            display_order: entry.display_order,
        };
        let row = diesel::insert_into(knife_types::table)
            .values(&new_row)
            .returning(KnifeTypeRow::as_returning())
            .get_result::<KnifeTypeRow>(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(KnifeType::from(row))
    }

    async fn update(
        &self,
        id: Uuid,
        update: KnifeTypeUpdate,
    ) -> Result<Option<KnifeType>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let changeset = KnifeTypeChangeset {
            name: update.name.as_deref(),
            market_price: update.market_price,
            discount_price: update.discount_price,
            image_url: update.image_url.as_deref(),
            display_order: update.display_order,
            is_active: update.is_active,
            updated_at: Utc::now(),
        };
        let row = diesel::update(knife_types::table.filter(knife_types::id.eq(id)))
            .set(&changeset)
            .returning(KnifeTypeRow::as_returning())
            .get_result::<KnifeTypeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        Ok(row.map(KnifeType::from))
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let updated = diesel::update(knife_types::table.filter(knife_types::id.eq(id)))
            .set((
                knife_types::is_active.eq(false),
                knife_types::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(updated > 0)
    }
}
