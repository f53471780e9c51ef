//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! The booking row and its item rows are inserted by separate calls on
//! purpose: the workflow owns the insert-then-compensate sequence, so this
//! adapter must not wrap the pair in a transaction behind its back.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, NewBooking, NewBookingItem,
};
use crate::domain::{Booking, BookingItem, BookingStatus, BookingWithItems, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BookingItemRow, BookingRow, NewBookingItemRow, NewBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::{booking_items, bookings};

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_with_items(
        &self,
        rows: Vec<BookingRow>,
    ) -> Result<Vec<BookingWithItems>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let item_rows: Vec<BookingItemRow> = booking_items::table
            .filter(booking_items::booking_id.eq_any(&ids))
            .select(BookingItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;

        let mut grouped: HashMap<Uuid, Vec<BookingItem>> = HashMap::new();
        for item in item_rows {
            grouped
                .entry(item.booking_id)
                .or_default()
                .push(BookingItem::from(item));
        }

        rows.into_iter()
            .map(|row| {
                let items = grouped.remove(&row.id).unwrap_or_default();
                row_to_booking(row).map(|booking| BookingWithItems { booking, items })
            })
            .collect()
    }
}

fn map_pool(error: PoolError) -> BookingRepositoryError {
    map_pool_error(error, BookingRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> BookingRepositoryError {
    map_diesel_error(
        error,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
    )
}

fn row_to_booking(row: BookingRow) -> Result<Booking, BookingRepositoryError> {
    row.into_domain().map_err(BookingRepositoryError::query)
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_row = NewBookingRow {
            id: Uuid::new_v4(),
            user_id: *booking.user_id.as_uuid(),
            booking_date: booking.booking_date,
            booking_time: &booking.booking_time,
            total_quantity: booking.total_quantity,
            total_amount: booking.total_amount,
            status: booking.status.as_str(),
            special_instructions: booking.special_instructions.as_deref(),
        };
        let row = diesel::insert_into(bookings::table)
            .values(&new_row)
            .returning(BookingRow::as_returning())
            .get_result::<BookingRow>(&mut conn)
            .await
            .map_err(map_db)?;
        row_to_booking(row)
    }

    async fn insert_items(
        &self,
        booking_id: Uuid,
        items: &[NewBookingItem],
    ) -> Result<Vec<BookingItem>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_rows: Vec<NewBookingItemRow> = items
            .iter()
            .map(|item| NewBookingItemRow {
                id: Uuid::new_v4(),
                booking_id,
                knife_type_id: item.knife_type_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
            })
            .collect();
        let rows: Vec<BookingItemRow> = diesel::insert_into(booking_items::table)
            .values(&new_rows)
            .returning(BookingItemRow::as_returning())
            .get_results(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(rows.into_iter().map(BookingItem::from).collect())
    }

    async fn delete_booking(&self, booking_id: Uuid) -> Result<(), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        // Item rows, if any made it in, go with the booking via FK cascade.
        diesel::delete(bookings::table.filter(bookings::id.eq(booking_id)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_db)
    }

    async fn find_for_user(
        &self,
        booking_id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = bookings::table
            .filter(
                bookings::id
                    .eq(booking_id)
                    .and(bookings::user_id.eq(user_id.as_uuid())),
            )
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        row.map(row_to_booking).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BookingWithItems>, BookingRepositoryError> {
        let rows = {
            let mut conn = self.pool.get().await.map_err(map_pool)?;
            bookings::table
                .filter(bookings::user_id.eq(user_id.as_uuid()))
                .order(bookings::created_at.desc())
                .select(BookingRow::as_select())
                .load::<BookingRow>(&mut conn)
                .await
                .map_err(map_db)?
        };
        self.load_with_items(rows).await
    }

    async fn list_all(&self) -> Result<Vec<BookingWithItems>, BookingRepositoryError> {
        let rows = {
            let mut conn = self.pool.get().await.map_err(map_pool)?;
            bookings::table
                .order(bookings::created_at.desc())
                .select(BookingRow::as_select())
                .load::<BookingRow>(&mut conn)
                .await
                .map_err(map_db)?
        };
        self.load_with_items(rows).await
    }

    async fn set_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = diesel::update(bookings::table.filter(bookings::id.eq(booking_id)))
            .set((
                bookings::status.eq(status.as_str()),
                bookings::updated_at.eq(Utc::now()),
            ))
            .returning(BookingRow::as_returning())
            .get_result::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;
        row.map(row_to_booking).transpose()
    }
}
