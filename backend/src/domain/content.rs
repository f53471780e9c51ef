//! Display-only content resources: promotional banners and the bank accounts
//! shown on the payment page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A promotional banner shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    /// Stable identifier.
    pub id: Uuid,
    /// Accessible title.
    pub title: String,
    /// Banner image.
    pub image_url: String,
    /// Optional click-through target.
    pub link_url: Option<String>,
    /// Whether the banner is currently shown.
    pub is_active: bool,
    /// Sort order in the carousel.
    pub display_order: i32,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A bank account displayed for wire-transfer payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAccount {
    /// Stable identifier.
    pub id: Uuid,
    /// Bank display name.
    pub bank_name: String,
    /// Account number as displayed.
    pub account_number: String,
    /// Account holder name.
    pub account_holder: String,
    /// Whether the account is currently shown.
    pub is_active: bool,
}
