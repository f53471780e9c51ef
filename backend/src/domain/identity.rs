//! Identity aggregates for the two parallel account kinds.
//!
//! Clients authenticate by phone verification and admins by password; both
//! resolve to strongly typed identities that downstream code consumes through
//! the [`AuthenticatedUser`] tagged union, branching on its kind exhaustively
//! rather than sniffing field presence.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::phone::PhoneNumber;

/// Validation errors shared by the identifier newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdValidationError {
    /// The identifier was empty.
    Empty,
    /// The identifier was not a valid UUID.
    InvalidUuid,
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier must not be empty"),
            Self::InvalidUuid => write!(f, "identifier must be a valid UUID"),
        }
    }
}

impl std::error::Error for IdValidationError {}

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            /// Validate and construct an identifier from string input.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = id.as_ref();
                if raw.is_empty() {
                    return Err(IdValidationError::Empty);
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdValidationError::InvalidUuid)
            }

            /// Construct an identifier from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_uuid_id! {
    /// Stable client identifier stored as a UUID.
    UserId
}

define_uuid_id! {
    /// Stable admin identifier stored as a UUID.
    AdminId
}

/// Back-office role carried on admin identities.
///
/// Roles gate coarse permission checks by string comparison; there is no
/// finer-grained permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access, including admin account management.
    SuperAdmin,
    /// Day-to-day back-office operation.
    Admin,
    /// Read-mostly staff access.
    Staff,
}

impl AdminRole {
    /// Stable string form used in persistence.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }

    /// Parse the persisted string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "super_admin" => Some(Self::SuperAdmin),
            "admin" => Some(Self::Admin),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }
}

/// A phone-verified consumer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientUser {
    /// Stable identifier.
    pub id: UserId,
    /// Normalised phone number, unique per client.
    pub phone: PhoneNumber,
    /// Display name chosen at signup.
    pub name: String,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A password-authenticated back-office account.
///
/// The password hash never leaves the persistence layer; this aggregate only
/// carries what adapters may expose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    /// Stable identifier.
    pub id: AdminId,
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Back-office role.
    pub role: AdminRole,
}

/// Discriminated union of the two identity kinds.
///
/// Serialises with a `type` tag (`client` or `admin`) so API consumers can
/// branch without duck-typing on field presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuthenticatedUser {
    /// Phone-verified client identity.
    #[serde(rename = "client")]
    Client(ClientUser),
    /// Password-authenticated admin identity.
    #[serde(rename = "admin")]
    Admin(AdminUser),
}

impl AuthenticatedUser {
    /// Subject identifier as stored in session tokens.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::Client(user) => user.id.to_string(),
            Self::Admin(admin) => admin.id.to_string(),
        }
    }
}
