//! PostgreSQL-backed `AddressRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AddressRepository, AddressRepositoryError};
use crate::domain::{Address, AddressUpdate, NewAddress, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AddressChangeset, AddressRow, NewAddressRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_addresses;

/// Diesel-backed implementation of the address repository port.
#[derive(Clone)]
pub struct DieselAddressRepository {
    pool: DbPool,
}

impl DieselAddressRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> AddressRepositoryError {
    map_pool_error(error, AddressRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> AddressRepositoryError {
    map_diesel_error(
        error,
        AddressRepositoryError::query,
        AddressRepositoryError::connection,
    )
}

fn row_to_address(row: AddressRow) -> Result<Address, AddressRepositoryError> {
    row.into_domain().map_err(AddressRepositoryError::query)
}

#[async_trait]
impl AddressRepository for DieselAddressRepository {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Address>, AddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<AddressRow> = user_addresses::table
            .filter(user_addresses::user_id.eq(user_id.as_uuid()))
            .order((
                user_addresses::is_default.desc(),
                user_addresses::created_at.desc(),
            ))
            .select(AddressRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;
        rows.into_iter().map(row_to_address).collect()
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<Address>, AddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = user_addresses::table
            .filter(
                user_addresses::id
                    .eq(id)
                    .and(user_addresses::user_id.eq(user_id.as_uuid())),
            )
            .select(AddressRow::as_select())
            .first::<AddressRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        row.map(row_to_address).transpose()
    }

    async fn insert(
        &self,
        user_id: &UserId,
        address: NewAddress,
    ) -> Result<Address, AddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_row = NewAddressRow {
            id: Uuid::new_v4(),
            user_id: *user_id.as_uuid(),
            address_name: &address.address_name,
            address: &address.address,
            detail_address: address.detail_address.as_deref(),
            is_default: address.is_default,
            address_type: address.address_type.as_str(),
        };
        let row = diesel::insert_into(user_addresses::table)
            .values(&new_row)
            .returning(AddressRow::as_returning())
            .get_result::<AddressRow>(&mut conn)
            .await
            .map_err(map_db)?;
        row_to_address(row)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: &UserId,
        update: AddressUpdate,
    ) -> Result<Option<Address>, AddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let changeset = AddressChangeset {
            address_name: update.address_name.as_deref(),
            address: update.address.as_deref(),
            detail_address: update.detail_address.as_deref(),
            is_default: update.is_default,
            address_type: update.address_type.map(|kind| kind.as_str()),
            updated_at: Utc::now(),
        };
        let row = diesel::update(
            user_addresses::table.filter(
                user_addresses::id
                    .eq(id)
                    .and(user_addresses::user_id.eq(user_id.as_uuid())),
            ),
        )
        .set(&changeset)
        .returning(AddressRow::as_returning())
        .get_result::<AddressRow>(&mut conn)
        .await
        .optional()
        .map_err(map_db)?;
        row.map(row_to_address).transpose()
    }

    async fn delete(&self, id: Uuid, user_id: &UserId) -> Result<bool, AddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let deleted = diesel::delete(
            user_addresses::table.filter(
                user_addresses::id
                    .eq(id)
                    .and(user_addresses::user_id.eq(user_id.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_db)?;
        Ok(deleted > 0)
    }

    async fn clear_default(&self, user_id: &UserId) -> Result<(), AddressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::update(
            user_addresses::table.filter(
                user_addresses::user_id
                    .eq(user_id.as_uuid())
                    .and(user_addresses::is_default.eq(true)),
            ),
        )
        .set((
            user_addresses::is_default.eq(false),
            user_addresses::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_db)
    }
}
