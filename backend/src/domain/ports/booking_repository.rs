//! Port abstraction for booking persistence adapters.
//!
//! The booking and item inserts are deliberately separate operations: the
//! backing store offers no multi-table transaction to the workflow, so the
//! service layer owns the insert-then-compensate sequence.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Booking, BookingItem, BookingStatus, BookingWithItems, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by booking adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "booking repository query failed: {message}",
    }
}

/// Fields for creating a booking row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    /// Owning client.
    pub user_id: UserId,
    /// Requested pickup date.
    pub booking_date: NaiveDate,
    /// Requested pickup time slot.
    pub booking_time: String,
    /// Sum of item quantities (computed by the workflow).
    pub total_quantity: i32,
    /// Sum of item totals in KRW (computed by the workflow).
    pub total_amount: i64,
    /// Initial lifecycle status.
    pub status: BookingStatus,
    /// Free-form instructions for the courier.
    pub special_instructions: Option<String>,
}

/// Fields for creating a booking item row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookingItem {
    /// Catalogue entry this line refers to.
    pub knife_type_id: Uuid,
    /// Number of knives of this type.
    pub quantity: i32,
    /// Price snapshot per unit in KRW.
    pub unit_price: i64,
    /// `unit_price * quantity` in KRW.
    pub total_price: i64,
}

/// Port for booking persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert the booking row.
    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, BookingRepositoryError>;

    /// Insert the item rows for an existing booking.
    async fn insert_items(
        &self,
        booking_id: Uuid,
        items: &[NewBookingItem],
    ) -> Result<Vec<BookingItem>, BookingRepositoryError>;

    /// Delete a booking row (compensating action for failed item inserts).
    async fn delete_booking(&self, booking_id: Uuid) -> Result<(), BookingRepositoryError>;

    /// Fetch a booking owned by a specific user.
    async fn find_for_user(
        &self,
        booking_id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// List a user's bookings with items, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BookingWithItems>, BookingRepositoryError>;

    /// List every booking with items (admin view), newest first.
    async fn list_all(&self) -> Result<Vec<BookingWithItems>, BookingRepositoryError>;

    /// Overwrite a booking's status, returning the updated row or `None`
    /// when the id does not exist.
    async fn set_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingRepositoryError>;
}
