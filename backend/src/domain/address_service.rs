//! Delivery address use-case service.
//!
//! Owns the single-default invariant: whenever an address is created or
//! updated with the default flag, every other row's flag is cleared first in
//! the same operation.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::address::{Address, AddressUpdate, NewAddress};
use super::error::Error;
use super::identity::UserId;
use super::ports::{AddressRepository, AddressRepositoryError, AddressService};

/// Address service implementing the [`AddressService`] port.
#[derive(Clone)]
pub struct AddressServiceImpl {
    repository: Arc<dyn AddressRepository>,
}

fn map_error(error: AddressRepositoryError) -> Error {
    match error {
        AddressRepositoryError::Connection { message } => Error::service_unavailable(message),
        AddressRepositoryError::Query { message } => Error::internal(message),
    }
}

impl AddressServiceImpl {
    /// Create the service with its repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AddressRepository>) -> Self {
        Self { repository }
    }

    async fn require_owned(&self, id: Uuid, user_id: &UserId) -> Result<Address, Error> {
        self.repository
            .find_for_user(id, user_id)
            .await
            .map_err(map_error)?
            .ok_or_else(|| Error::not_found("address not found"))
    }
}

#[async_trait]
impl AddressService for AddressServiceImpl {
    async fn list(&self, user_id: &UserId) -> Result<Vec<Address>, Error> {
        self.repository
            .list_for_user(user_id)
            .await
            .map_err(map_error)
    }

    async fn create(&self, user_id: &UserId, address: NewAddress) -> Result<Address, Error> {
        if address.address_name.trim().is_empty() || address.address.trim().is_empty() {
            return Err(Error::invalid_request("address fields must not be empty"));
        }
        if address.is_default {
            self.repository
                .clear_default(user_id)
                .await
                .map_err(map_error)?;
        }
        self.repository
            .insert(user_id, address)
            .await
            .map_err(map_error)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: &UserId,
        update: AddressUpdate,
    ) -> Result<Address, Error> {
        self.require_owned(id, user_id).await?;
        if update.is_default == Some(true) {
            self.repository
                .clear_default(user_id)
                .await
                .map_err(map_error)?;
        }
        self.repository
            .update(id, user_id, update)
            .await
            .map_err(map_error)?
            .ok_or_else(|| Error::not_found("address not found"))
    }

    async fn delete(&self, id: Uuid, user_id: &UserId) -> Result<(), Error> {
        let deleted = self
            .repository
            .delete(id, user_id)
            .await
            .map_err(map_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("address not found"))
        }
    }

    async fn set_default(&self, id: Uuid, user_id: &UserId) -> Result<Address, Error> {
        self.update(
            id,
            user_id,
            AddressUpdate {
                is_default: Some(true),
                ..AddressUpdate::default()
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    //! Invariant coverage: arbitrary create/update sequences leave at most
    //! one default address per user.
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::domain::AddressKind;

    #[derive(Default)]
    struct StubAddresses {
        rows: Mutex<Vec<Address>>,
    }

    impl StubAddresses {
        fn default_count(&self, user_id: &UserId) -> usize {
            self.rows
                .lock()
                .expect("lock")
                .iter()
                .filter(|a| &a.user_id == user_id && a.is_default)
                .count()
        }
    }

    #[async_trait]
    impl AddressRepository for StubAddresses {
        async fn list_for_user(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<Address>, AddressRepositoryError> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .iter()
                .filter(|a| &a.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn find_for_user(
            &self,
            id: Uuid,
            user_id: &UserId,
        ) -> Result<Option<Address>, AddressRepositoryError> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .iter()
                .find(|a| a.id == id && &a.user_id == user_id)
                .cloned())
        }

        async fn insert(
            &self,
            user_id: &UserId,
            address: NewAddress,
        ) -> Result<Address, AddressRepositoryError> {
            let row = Address {
                id: Uuid::new_v4(),
                user_id: *user_id,
                address_name: address.address_name,
                address: address.address,
                detail_address: address.detail_address,
                is_default: address.is_default,
                address_type: address.address_type,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.rows.lock().expect("lock").push(row.clone());
            Ok(row)
        }

        async fn update(
            &self,
            id: Uuid,
            user_id: &UserId,
            update: AddressUpdate,
        ) -> Result<Option<Address>, AddressRepositoryError> {
            let mut rows = self.rows.lock().expect("lock");
            for row in rows.iter_mut() {
                if row.id == id && &row.user_id == user_id {
                    if let Some(name) = update.address_name {
                        row.address_name = name;
                    }
                    if let Some(address) = update.address {
                        row.address = address;
                    }
                    if let Some(detail) = update.detail_address {
                        row.detail_address = Some(detail);
                    }
                    if let Some(is_default) = update.is_default {
                        row.is_default = is_default;
                    }
                    if let Some(kind) = update.address_type {
                        row.address_type = kind;
                    }
                    row.updated_at = Utc::now();
                    return Ok(Some(row.clone()));
                }
            }
            Ok(None)
        }

        async fn delete(
            &self,
            id: Uuid,
            user_id: &UserId,
        ) -> Result<bool, AddressRepositoryError> {
            let mut rows = self.rows.lock().expect("lock");
            let before = rows.len();
            rows.retain(|a| !(a.id == id && &a.user_id == user_id));
            Ok(rows.len() != before)
        }

        async fn clear_default(&self, user_id: &UserId) -> Result<(), AddressRepositoryError> {
            for row in self.rows.lock().expect("lock").iter_mut() {
                if &row.user_id == user_id {
                    row.is_default = false;
                }
            }
            Ok(())
        }
    }

    fn new_address(name: &str, is_default: bool) -> NewAddress {
        NewAddress {
            address_name: name.into(),
            address: "12 Mapo-daero".into(),
            detail_address: None,
            is_default,
            address_type: AddressKind::Home,
        }
    }

    #[tokio::test]
    async fn sequences_of_defaults_leave_at_most_one() {
        let repo = Arc::new(StubAddresses::default());
        let service = AddressServiceImpl::new(repo.clone());
        let user = UserId::random();

        let first = service
            .create(&user, new_address("Home", true))
            .await
            .expect("create first");
        let second = service
            .create(&user, new_address("Work", true))
            .await
            .expect("create second");
        assert_eq!(repo.default_count(&user), 1);

        service
            .set_default(first.id, &user)
            .await
            .expect("promote first");
        assert_eq!(repo.default_count(&user), 1);

        service
            .update(
                second.id,
                &user,
                AddressUpdate {
                    is_default: Some(true),
                    ..AddressUpdate::default()
                },
            )
            .await
            .expect("promote second via update");
        assert_eq!(repo.default_count(&user), 1);
    }

    #[tokio::test]
    async fn other_users_defaults_are_untouched() {
        let repo = Arc::new(StubAddresses::default());
        let service = AddressServiceImpl::new(repo.clone());
        let alice = UserId::random();
        let bob = UserId::random();

        service
            .create(&alice, new_address("Home", true))
            .await
            .expect("alice default");
        service
            .create(&bob, new_address("Home", true))
            .await
            .expect("bob default");
        assert_eq!(repo.default_count(&alice), 1);
        assert_eq!(repo.default_count(&bob), 1);
    }

    #[tokio::test]
    async fn set_default_on_missing_address_is_not_found() {
        let service = AddressServiceImpl::new(Arc::new(StubAddresses::default()));
        let err = service
            .set_default(Uuid::new_v4(), &UserId::random())
            .await
            .expect_err("missing address");
        assert_eq!(err.code(), crate::domain::ErrorCode::NotFound);
    }
}
