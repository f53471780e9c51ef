//! Booking aggregate and its line items.
//!
//! A booking's totals are always computed server-side from the live catalogue
//! at creation time, never taken from the client. Item rows snapshot the sale
//! price so historical bookings are unaffected by later catalogue changes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::UserId;

/// Lifecycle status of a booking.
///
/// The booking workflow only ever creates `pending` bookings; all other
/// transitions happen through the admin API, which accepts any status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting confirmation.
    Pending,
    /// Confirmed by staff.
    Confirmed,
    /// Pickup/sharpening underway.
    InProgress,
    /// Finished and delivered.
    Completed,
    /// Cancelled by the client or staff.
    Cancelled,
}

impl BookingStatus {
    /// Stable string form used in persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the persisted string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether a client may still cancel a booking in this status.
    #[must_use]
    pub fn client_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning client.
    pub user_id: UserId,
    /// Requested pickup date.
    pub booking_date: NaiveDate,
    /// Requested pickup time slot, e.g. `"14:00"`.
    pub booking_time: String,
    /// Sum of item quantities.
    pub total_quantity: i32,
    /// Sum of item totals in KRW.
    pub total_amount: i64,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Free-form instructions for the courier.
    pub special_instructions: Option<String>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A booking line item with its price snapshot.
///
/// `unit_price` is the catalogue `discount_price` captured at booking time,
/// not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingItem {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning booking.
    pub booking_id: Uuid,
    /// Catalogue entry this line refers to.
    pub knife_type_id: Uuid,
    /// Number of knives of this type.
    pub quantity: i32,
    /// Price snapshot per unit in KRW.
    pub unit_price: i64,
    /// `unit_price * quantity` in KRW.
    pub total_price: i64,
}

/// A booking together with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithItems {
    /// The booking row.
    #[serde(flatten)]
    pub booking: Booking,
    /// Line items belonging to the booking.
    pub items: Vec<BookingItem>,
}

/// One requested line in a booking creation request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingLine {
    /// Catalogue entry to book.
    pub knife_type_id: Uuid,
    /// Number of knives of this type.
    pub quantity: i32,
}

/// Validated input for the booking creation workflow.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Requested pickup date.
    pub booking_date: NaiveDate,
    /// Requested pickup time slot.
    pub booking_time: String,
    /// Requested line items; must be non-empty.
    pub items: Vec<BookingLine>,
    /// Free-form instructions for the courier.
    #[serde(default)]
    pub special_instructions: Option<String>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BookingStatus::Pending, true)]
    #[case(BookingStatus::Confirmed, true)]
    #[case(BookingStatus::InProgress, false)]
    #[case(BookingStatus::Completed, false)]
    #[case(BookingStatus::Cancelled, false)]
    fn client_cancellation_window(#[case] status: BookingStatus, #[case] expected: bool) {
        assert_eq!(status.client_cancellable(), expected);
    }

    #[rstest]
    #[case("pending", Some(BookingStatus::Pending))]
    #[case("in_progress", Some(BookingStatus::InProgress))]
    #[case("done", None)]
    fn status_parses_persisted_form(#[case] input: &str, #[case] expected: Option<BookingStatus>) {
        assert_eq!(BookingStatus::parse(input), expected);
    }
}
