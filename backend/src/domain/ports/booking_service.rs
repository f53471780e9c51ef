//! Driving port for the booking workflow use-cases.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingStatus, BookingWithItems, CreateBookingRequest, Error, UserId,
};

/// Domain use-case port for bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Validate a cart against the live catalogue, persist the booking and
    /// its items, and emit a best-effort notification.
    async fn create_booking(
        &self,
        user_id: &UserId,
        request: CreateBookingRequest,
    ) -> Result<BookingWithItems, Error>;

    /// Cancel a booking owned by the user. Idempotent in outcome: cancelling
    /// an already-cancelled booking succeeds.
    async fn cancel_booking(&self, booking_id: Uuid, user_id: &UserId) -> Result<(), Error>;

    /// List the user's bookings with items, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<BookingWithItems>, Error>;

    /// List every booking with items (admin view), newest first.
    async fn list_all(&self) -> Result<Vec<BookingWithItems>, Error>;

    /// Overwrite a booking's status (admin path, unscoped by user).
    async fn update_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, Error>;
}
