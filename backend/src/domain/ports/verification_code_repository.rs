//! Port abstraction for one-time verification code persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{OtpPurpose, PhoneNumber, VerificationCode};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by verification code adapters.
    pub enum VerificationCodeRepositoryError {
        /// Repository connection could not be established.
        Connection => "verification code repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "verification code repository query failed: {message}",
    }
}

/// Fields for issuing a verification code row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVerificationCode {
    /// Phone the code is being sent to.
    pub phone: PhoneNumber,
    /// Generated code digits.
    pub code: String,
    /// Flow the code is issued for.
    pub purpose: OtpPurpose,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Port for verification code persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Persist a freshly issued code.
    async fn insert(
        &self,
        code: NewVerificationCode,
    ) -> Result<VerificationCode, VerificationCodeRepositoryError>;

    /// Fetch the most recently issued unused code for a phone, if any.
    ///
    /// Expiry is not filtered here; the domain decides liveness so the
    /// "only the latest code counts" rule stays in one place.
    async fn latest_unused(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<VerificationCode>, VerificationCodeRepositoryError>;

    /// Mark a code consumed (one-time use).
    async fn mark_used(&self, id: Uuid) -> Result<(), VerificationCodeRepositoryError>;
}
