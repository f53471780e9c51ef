//! User notifications.
//!
//! Notifications are created as side effects of the booking workflow and of
//! admin actions; the owning user only ever marks them read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::UserId;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Booking lifecycle updates.
    Booking,
    /// Coupon grants and expiry reminders.
    Coupon,
    /// Anything staff broadcasts manually.
    System,
}

impl NotificationKind {
    /// Stable string form used in persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Coupon => "coupon",
            Self::System => "system",
        }
    }

    /// Parse the persisted string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "booking" => Some(Self::Booking),
            "coupon" => Some(Self::Coupon),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// A persisted notification row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: UserId,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Category.
    pub kind: NotificationKind,
    /// Booking this notification refers to, when applicable.
    pub related_booking_id: Option<Uuid>,
    /// Whether the owner has read it.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    /// Owning user.
    pub user_id: UserId,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Category.
    pub kind: NotificationKind,
    /// Booking this notification refers to, when applicable.
    pub related_booking_id: Option<Uuid>,
}
