//! Booking workflow service.
//!
//! Creation is a two-step insert (booking row, then item rows) with a
//! compensating delete because the backing store exposes no multi-table
//! transaction to the workflow. Prices are snapshotted from the live
//! catalogue at creation time; the client never supplies prices.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};
use uuid::Uuid;

use super::booking::{Booking, BookingStatus, BookingWithItems, CreateBookingRequest};
use super::error::Error;
use super::identity::UserId;
use super::notification::{NewNotification, NotificationKind};
use super::ports::{
    BookingRepository, BookingRepositoryError, BookingService, CatalogueRepository,
    CatalogueRepositoryError, NewBooking, NewBookingItem, NotificationService,
};

/// Booking workflow implementing the [`BookingService`] port.
#[derive(Clone)]
pub struct BookingServiceImpl {
    bookings: Arc<dyn BookingRepository>,
    catalogue: Arc<dyn CatalogueRepository>,
    notifications: Arc<dyn NotificationService>,
}

fn map_booking_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => Error::service_unavailable(message),
        BookingRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => Error::service_unavailable(message),
        CatalogueRepositoryError::Query { message } => Error::internal(message),
    }
}

fn validate_request(request: &CreateBookingRequest) -> Result<(), Error> {
    if request.items.is_empty() {
        return Err(Error::invalid_request("booking must contain at least one item"));
    }
    if request.items.iter().any(|line| line.quantity < 1) {
        return Err(Error::invalid_request("item quantities must be at least 1"));
    }
    if request.booking_time.trim().is_empty() {
        return Err(Error::invalid_request("booking time must not be empty"));
    }
    Ok(())
}

impl BookingServiceImpl {
    /// Create the workflow with its collaborating ports.
    #[must_use]
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        catalogue: Arc<dyn CatalogueRepository>,
        notifications: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            bookings,
            catalogue,
            notifications,
        }
    }

    /// Delete the booking row left behind by a failed item insert.
    ///
    /// Retried once; if the retry also fails the orphan row is logged loudly
    /// for manual cleanup rather than silently swallowed.
    async fn compensate_failed_items(&self, booking_id: Uuid) {
        if let Err(first) = self.bookings.delete_booking(booking_id).await {
            warn!(%booking_id, error = %first, "compensating delete failed, retrying");
            if let Err(second) = self.bookings.delete_booking(booking_id).await {
                error!(
                    %booking_id,
                    error = %second,
                    "compensating delete failed twice; orphan booking row remains"
                );
            }
        }
    }

    async fn notify_best_effort(&self, notification: NewNotification) {
        if let Err(err) = self.notifications.notify(notification).await {
            // Notifications are informational; never fail the booking for one.
            warn!(error = %err, "failed to write booking notification");
        }
    }
}

#[async_trait]
impl BookingService for BookingServiceImpl {
    async fn create_booking(
        &self,
        user_id: &UserId,
        request: CreateBookingRequest,
    ) -> Result<BookingWithItems, Error> {
        validate_request(&request)?;

        let ids: Vec<Uuid> = request
            .items
            .iter()
            .map(|line| line.knife_type_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let entries = self
            .catalogue
            .find_active_by_ids(&ids)
            .await
            .map_err(map_catalogue_error)?;
        let by_id: HashMap<Uuid, _> = entries.into_iter().map(|e| (e.id, e)).collect();

        let mut items = Vec::with_capacity(request.items.len());
        let mut total_quantity: i32 = 0;
        let mut total_amount: i64 = 0;
        for line in &request.items {
            let Some(entry) = by_id.get(&line.knife_type_id) else {
                // Missing or soft-deleted: discontinued items cannot be booked.
                return Err(Error::not_found("knife type unavailable"));
            };
            let unit_price = entry.discount_price;
            let total_price = unit_price * i64::from(line.quantity);
            total_quantity += line.quantity;
            total_amount += total_price;
            items.push(NewBookingItem {
                knife_type_id: line.knife_type_id,
                quantity: line.quantity,
                unit_price,
                total_price,
            });
        }

        let booking = self
            .bookings
            .insert_booking(NewBooking {
                user_id: *user_id,
                booking_date: request.booking_date,
                booking_time: request.booking_time.clone(),
                total_quantity,
                total_amount,
                status: BookingStatus::Pending,
                special_instructions: request.special_instructions.clone(),
            })
            .await
            .map_err(map_booking_error)?;

        let inserted = match self.bookings.insert_items(booking.id, &items).await {
            Ok(inserted) => inserted,
            Err(err) => {
                self.compensate_failed_items(booking.id).await;
                return Err(Error::internal(format!(
                    "failed to save booking items: {err}"
                )));
            }
        };

        self.notify_best_effort(NewNotification {
            user_id: *user_id,
            title: "Booking received".into(),
            message: format!(
                "Your sharpening booking for {} {} has been received.",
                booking.booking_date, booking.booking_time
            ),
            kind: NotificationKind::Booking,
            related_booking_id: Some(booking.id),
        })
        .await;

        Ok(BookingWithItems {
            booking,
            items: inserted,
        })
    }

    async fn cancel_booking(&self, booking_id: Uuid, user_id: &UserId) -> Result<(), Error> {
        let booking = self
            .bookings
            .find_for_user(booking_id, user_id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found("booking not found"))?;
        if booking.status == BookingStatus::Cancelled {
            // Repeat cancellations succeed without touching the row.
            return Ok(());
        }
        if !booking.status.client_cancellable() {
            return Err(Error::conflict("booking can no longer be cancelled"));
        }
        self.bookings
            .set_status(booking_id, BookingStatus::Cancelled)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found("booking not found"))?;
        self.notify_best_effort(NewNotification {
            user_id: *user_id,
            title: "Booking cancelled".into(),
            message: format!(
                "Your booking for {} {} has been cancelled.",
                booking.booking_date, booking.booking_time
            ),
            kind: NotificationKind::Booking,
            related_booking_id: Some(booking_id),
        })
        .await;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<BookingWithItems>, Error> {
        self.bookings
            .list_for_user(user_id)
            .await
            .map_err(map_booking_error)
    }

    async fn list_all(&self) -> Result<Vec<BookingWithItems>, Error> {
        self.bookings.list_all().await.map_err(map_booking_error)
    }

    async fn update_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, Error> {
        self.bookings
            .set_status(booking_id, status)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found("booking not found"))
    }
}
