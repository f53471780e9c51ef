//! Port abstraction for client (consumer account) persistence adapters.

use async_trait::async_trait;

use crate::domain::{ClientUser, PhoneNumber, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by client repository adapters.
    pub enum ClientRepositoryError {
        /// Repository connection could not be established.
        Connection => "client repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "client repository query failed: {message}",
        /// The phone number is already registered.
        DuplicatePhone => "phone number already registered: {message}",
    }
}

/// Fields for creating a client account at signup.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    /// Verified phone number.
    pub phone: PhoneNumber,
    /// Display name chosen at signup.
    pub name: String,
}

/// Port for client account persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Fetch a client by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<ClientUser>, ClientRepositoryError>;

    /// Fetch a client by normalised phone number.
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<ClientUser>, ClientRepositoryError>;

    /// Create a client account.
    ///
    /// Fails with [`ClientRepositoryError::DuplicatePhone`] when the phone
    /// number is already registered.
    async fn create(&self, client: NewClient) -> Result<ClientUser, ClientRepositoryError>;
}
