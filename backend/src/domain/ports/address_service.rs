//! Driving port for delivery address use-cases.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Address, AddressUpdate, Error, NewAddress, UserId};

/// Domain use-case port for addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressService: Send + Sync {
    /// List the user's addresses, default first.
    async fn list(&self, user_id: &UserId) -> Result<Vec<Address>, Error>;

    /// Create an address, clearing any previous default when the new address
    /// is flagged default.
    async fn create(&self, user_id: &UserId, address: NewAddress) -> Result<Address, Error>;

    /// Apply a partial update, preserving the single-default invariant.
    async fn update(
        &self,
        id: Uuid,
        user_id: &UserId,
        update: AddressUpdate,
    ) -> Result<Address, Error>;

    /// Delete an address owned by the user.
    async fn delete(&self, id: Uuid, user_id: &UserId) -> Result<(), Error>;

    /// Promote an address to the user's single default.
    async fn set_default(&self, id: Uuid, user_id: &UserId) -> Result<Address, Error>;
}
