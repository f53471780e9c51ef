//! Client delivery addresses.
//!
//! Invariant: at most one address per user carries `is_default=true`. The
//! address service clears the flag on every other row in the same operation
//! that sets a new default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::UserId;

/// Label describing where an address points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// Home address.
    Home,
    /// Workplace address.
    Work,
    /// Anything else.
    Other,
}

impl AddressKind {
    /// Stable string form used in persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Work => "work",
            Self::Other => "other",
        }
    }

    /// Parse the persisted string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "home" => Some(Self::Home),
            "work" => Some(Self::Work),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: UserId,
    /// User-chosen label, e.g. "Home".
    pub address_name: String,
    /// Street address line.
    pub address: String,
    /// Unit/floor detail.
    pub detail_address: Option<String>,
    /// Whether this is the user's default address.
    pub is_default: bool,
    /// Address category.
    pub address_type: AddressKind,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an address.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    /// User-chosen label.
    pub address_name: String,
    /// Street address line.
    pub address: String,
    /// Unit/floor detail.
    #[serde(default)]
    pub detail_address: Option<String>,
    /// Whether this address becomes the default.
    #[serde(default)]
    pub is_default: bool,
    /// Address category.
    pub address_type: AddressKind,
}

/// Partial update applied to an address; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressUpdate {
    /// New label.
    #[serde(default)]
    pub address_name: Option<String>,
    /// New street address line.
    #[serde(default)]
    pub address: Option<String>,
    /// New unit/floor detail.
    #[serde(default)]
    pub detail_address: Option<String>,
    /// Promote (or demote) this address as the default.
    #[serde(default)]
    pub is_default: Option<bool>,
    /// New address category.
    #[serde(default)]
    pub address_type: Option<AddressKind>,
}
