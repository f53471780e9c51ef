//! PostgreSQL-backed `VerificationCodeRepository` implementation.
//!
//! The "most recently issued" rule is expressed as an `ORDER BY created_at
//! DESC LIMIT 1` over the unused rows for a phone; liveness (expiry) is the
//! domain's decision.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    NewVerificationCode, VerificationCodeRepository, VerificationCodeRepositoryError,
};
use crate::domain::{PhoneNumber, VerificationCode};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewVerificationCodeRow, VerificationCodeRow};
use super::pool::{DbPool, PoolError};
use super::schema::verification_codes;

/// Diesel-backed implementation of the verification code port.
#[derive(Clone)]
pub struct DieselVerificationCodeRepository {
    pool: DbPool,
}

impl DieselVerificationCodeRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> VerificationCodeRepositoryError {
    map_pool_error(error, VerificationCodeRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> VerificationCodeRepositoryError {
    map_diesel_error(
        error,
        VerificationCodeRepositoryError::query,
        VerificationCodeRepositoryError::connection,
    )
}

fn row_to_code(row: VerificationCodeRow) -> Result<VerificationCode, VerificationCodeRepositoryError> {
    row.into_domain()
        .map_err(VerificationCodeRepositoryError::query)
}

#[async_trait]
impl VerificationCodeRepository for DieselVerificationCodeRepository {
    async fn insert(
        &self,
        code: NewVerificationCode,
    ) -> Result<VerificationCode, VerificationCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_row = NewVerificationCodeRow {
            id: Uuid::new_v4(),
            phone: code.phone.as_str(),
            code: &code.code,
            purpose: code.purpose.as_str(),
            expires_at: code.expires_at,
        };
        let row = diesel::insert_into(verification_codes::table)
            .values(&new_row)
            .returning(VerificationCodeRow::as_returning())
            .get_result::<VerificationCodeRow>(&mut conn)
            .await
            .map_err(map_db)?;
        row_to_code(row)
    }

    async fn latest_unused(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<VerificationCode>, VerificationCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = verification_codes::table
            .filter(
                verification_codes::phone
                    .eq(phone.as_str())
                    .and(verification_codes::used.eq(false)),
            )
            .order(verification_codes::created_at.desc())
            .select(VerificationCodeRow::as_select())
            .first::<VerificationCodeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        row.map(row_to_code).transpose()
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), VerificationCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::update(verification_codes::table.filter(verification_codes::id.eq(id)))
            .set(verification_codes::used.eq(true))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_db)
    }
}
