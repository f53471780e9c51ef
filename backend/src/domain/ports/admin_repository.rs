//! Port abstraction for admin account persistence adapters.

use async_trait::async_trait;

use crate::domain::{AdminId, AdminUser};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by admin repository adapters.
    pub enum AdminRepositoryError {
        /// Repository connection could not be established.
        Connection => "admin repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "admin repository query failed: {message}",
    }
}

/// An admin identity together with its stored password hash.
///
/// The hash stays inside the auth service; adapters never expose it over the
/// API surface.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminAccount {
    /// The admin identity.
    pub admin: AdminUser,
    /// bcrypt hash of the admin's password.
    pub password_hash: String,
}

/// Port for admin account persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Fetch an admin by identifier.
    async fn find_by_id(&self, id: &AdminId) -> Result<Option<AdminUser>, AdminRepositoryError>;

    /// Fetch an admin account (including credentials) by login name.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminAccount>, AdminRepositoryError>;
}
