//! PostgreSQL-backed `AdminRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AdminAccount, AdminRepository, AdminRepositoryError};
use crate::domain::{AdminId, AdminUser};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::AdminRow;
use super::pool::{DbPool, PoolError};
use super::schema::admins;

/// Diesel-backed implementation of the admin repository port.
#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> AdminRepositoryError {
    map_pool_error(error, AdminRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> AdminRepositoryError {
    map_diesel_error(
        error,
        AdminRepositoryError::query,
        AdminRepositoryError::connection,
    )
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn find_by_id(&self, id: &AdminId) -> Result<Option<AdminUser>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = admins::table
            .filter(admins::id.eq(id.as_uuid()))
            .select(AdminRow::as_select())
            .first::<AdminRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        row.map(|row| {
            row.into_domain()
                .map(|(admin, _)| admin)
                .map_err(AdminRepositoryError::query)
        })
        .transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminAccount>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = admins::table
            .filter(admins::username.eq(username))
            .select(AdminRow::as_select())
            .first::<AdminRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        row.map(|row| {
            row.into_domain()
                .map(|(admin, password_hash)| AdminAccount {
                    admin,
                    password_hash,
                })
                .map_err(AdminRepositoryError::query)
        })
        .transpose()
    }
}
