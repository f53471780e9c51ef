//! Port abstraction for delivery address persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Address, AddressUpdate, NewAddress, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by address adapters.
    pub enum AddressRepositoryError {
        /// Repository connection could not be established.
        Connection => "address repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "address repository query failed: {message}",
    }
}

/// Port for address persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// List a user's addresses, default first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Address>, AddressRepositoryError>;

    /// Fetch one address scoped to its owner.
    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<Address>, AddressRepositoryError>;

    /// Create an address for a user.
    async fn insert(
        &self,
        user_id: &UserId,
        address: NewAddress,
    ) -> Result<Address, AddressRepositoryError>;

    /// Apply a partial update scoped to the owner, returning the updated row
    /// or `None` when the address does not exist for that user.
    async fn update(
        &self,
        id: Uuid,
        user_id: &UserId,
        update: AddressUpdate,
    ) -> Result<Option<Address>, AddressRepositoryError>;

    /// Delete an address scoped to its owner, returning whether a row went.
    async fn delete(&self, id: Uuid, user_id: &UserId) -> Result<bool, AddressRepositoryError>;

    /// Clear `is_default` on every address the user owns.
    ///
    /// Called before promoting a new default so at most one row carries the
    /// flag.
    async fn clear_default(&self, user_id: &UserId) -> Result<(), AddressRepositoryError>;
}
