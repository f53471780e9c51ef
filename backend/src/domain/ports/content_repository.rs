//! Port abstraction for display-only content (banners, payment accounts).

use async_trait::async_trait;

use crate::domain::{Banner, PaymentAccount};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by content adapters.
    pub enum ContentRepositoryError {
        /// Repository connection could not be established.
        Connection => "content repository connection failed: {message}",
        /// Query failed during execution.
        Query => "content repository query failed: {message}",
    }
}

/// Port for display-only content reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// List active banners in display order.
    async fn list_banners(&self) -> Result<Vec<Banner>, ContentRepositoryError>;

    /// List active payment bank accounts.
    async fn list_payment_accounts(&self)
    -> Result<Vec<PaymentAccount>, ContentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise content reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContentRepository;

#[async_trait]
impl ContentRepository for FixtureContentRepository {
    async fn list_banners(&self) -> Result<Vec<Banner>, ContentRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_payment_accounts(
        &self,
    ) -> Result<Vec<PaymentAccount>, ContentRepositoryError> {
        Ok(Vec::new())
    }
}
