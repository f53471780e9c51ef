//! PostgreSQL-backed `ClientRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ClientRepository, ClientRepositoryError, NewClient};
use crate::domain::{ClientUser, PhoneNumber, UserId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the client repository port.
#[derive(Clone)]
pub struct DieselClientRepository {
    pool: DbPool,
}

impl DieselClientRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ClientRepositoryError {
    map_pool_error(error, ClientRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> ClientRepositoryError {
    map_diesel_error(
        error,
        ClientRepositoryError::query,
        ClientRepositoryError::connection,
    )
}

fn row_to_client(row: UserRow) -> Result<ClientUser, ClientRepositoryError> {
    row.into_domain().map_err(ClientRepositoryError::query)
}

#[async_trait]
impl ClientRepository for DieselClientRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<ClientUser>, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        row.map(row_to_client).transpose()
    }

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<ClientUser>, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = users::table
            .filter(users::phone.eq(phone.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        row.map(row_to_client).transpose()
    }

    async fn create(&self, client: NewClient) -> Result<ClientUser, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_row = NewUserRow {
            id: Uuid::new_v4(),
            phone: client.phone.as_str(),
            name: &client.name,
        };
        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    ClientRepositoryError::duplicate_phone(client.phone.to_string())
                } else {
                    map_db(err)
                }
            })?;
        row_to_client(row)
    }
}
