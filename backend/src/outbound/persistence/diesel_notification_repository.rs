//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{NewNotification, Notification, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the notification repository port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> NotificationRepositoryError {
    map_pool_error(error, NotificationRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> NotificationRepositoryError {
    map_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

fn row_to_notification(
    row: NotificationRow,
) -> Result<Notification, NotificationRepositoryError> {
    row.into_domain().map_err(NotificationRepositoryError::query)
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_row = NewNotificationRow {
            id: Uuid::new_v4(),
            user_id: *notification.user_id.as_uuid(),
            title: &notification.title,
            message: &notification.message,
            kind: notification.kind.as_str(),
            related_booking_id: notification.related_booking_id,
        };
        let row = diesel::insert_into(notifications::table)
            .values(&new_row)
            .returning(NotificationRow::as_returning())
            .get_result::<NotificationRow>(&mut conn)
            .await
            .map_err(map_db)?;
        row_to_notification(row)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .order(notifications::created_at.desc())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;
        rows.into_iter().map(row_to_notification).collect()
    }

    async fn unread_count(&self, user_id: &UserId) -> Result<i64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        notifications::table
            .filter(
                notifications::user_id
                    .eq(user_id.as_uuid())
                    .and(notifications::is_read.eq(false)),
            )
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_db)
    }

    async fn mark_read(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let updated = diesel::update(
            notifications::table.filter(
                notifications::id
                    .eq(id)
                    .and(notifications::user_id.eq(user_id.as_uuid())),
            ),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_db)?;
        Ok(updated > 0)
    }

    async fn mark_all_read(
        &self,
        user_id: &UserId,
    ) -> Result<usize, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::update(
            notifications::table.filter(
                notifications::user_id
                    .eq(user_id.as_uuid())
                    .and(notifications::is_read.eq(false)),
            ),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_db)
    }
}
