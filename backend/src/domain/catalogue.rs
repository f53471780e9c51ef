//! Service catalogue entries (knife types).
//!
//! Catalogue entries are soft-deleted via `is_active` rather than removed, so
//! historical booking items keep a valid reference. Prices are integer KRW;
//! `discount_price` is the effective sale price snapshotted into bookings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An orderable sharpening service line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KnifeType {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Reference market price in KRW.
    pub market_price: i64,
    /// Effective sale price in KRW; this is the price bookings snapshot.
    pub discount_price: i64,
    /// Optional product image.
    pub image_url: Option<String>,
    /// Soft-delete flag; inactive entries cannot be booked.
    pub is_active: bool,
    /// Sort order on the catalogue page.
    pub display_order: i32,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a catalogue entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewKnifeType {
    /// Display name.
    pub name: String,
    /// Reference market price in KRW.
    pub market_price: i64,
    /// Effective sale price in KRW.
    pub discount_price: i64,
    /// Optional product image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Sort order on the catalogue page.
    #[serde(default)]
    pub display_order: i32,
}

/// Partial update applied to a catalogue entry; absent fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KnifeTypeUpdate {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New market price in KRW.
    #[serde(default)]
    pub market_price: Option<i64>,
    /// New sale price in KRW.
    #[serde(default)]
    pub discount_price: Option<i64>,
    /// New product image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// New sort order.
    #[serde(default)]
    pub display_order: Option<i32>,
    /// Activate or soft-delete the entry.
    #[serde(default)]
    pub is_active: Option<bool>,
}
