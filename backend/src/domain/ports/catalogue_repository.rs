//! Port abstraction for catalogue (knife type) persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{KnifeType, KnifeTypeUpdate, NewKnifeType};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by catalogue adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection => "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "catalogue repository query failed: {message}",
    }
}

/// Port for catalogue persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// List active entries ordered by `display_order`.
    async fn list_active(&self) -> Result<Vec<KnifeType>, CatalogueRepositoryError>;

    /// List every entry (admin view), active or not.
    async fn list_all(&self) -> Result<Vec<KnifeType>, CatalogueRepositoryError>;

    /// Fetch the active entries among the referenced ids.
    ///
    /// Missing and inactive ids are simply absent from the result; the
    /// booking workflow turns that into a `NotFound`.
    async fn find_active_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<KnifeType>, CatalogueRepositoryError>;

    /// Create a catalogue entry.
    async fn insert(&self, entry: NewKnifeType) -> Result<KnifeType, CatalogueRepositoryError>;

    /// Apply a partial update, returning the updated entry or `None` when the
    /// id does not exist.
    async fn update(
        &self,
        id: Uuid,
        update: KnifeTypeUpdate,
    ) -> Result<Option<KnifeType>, CatalogueRepositoryError>;

    /// Soft-delete an entry by clearing `is_active`.
    ///
    /// Returns whether the entry existed.
    async fn deactivate(&self, id: Uuid) -> Result<bool, CatalogueRepositoryError>;
}
