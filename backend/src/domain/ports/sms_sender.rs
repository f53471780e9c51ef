//! Outbound port for delivering verification codes over SMS.

use async_trait::async_trait;

use crate::domain::PhoneNumber;

use super::define_port_error;

define_port_error! {
    /// Failures raised by SMS delivery adapters.
    pub enum SmsError {
        /// The provider rejected or failed to deliver the message.
        Delivery => "sms delivery failed: {message}",
        /// The adapter is misconfigured (missing credentials, bad URL).
        Configuration => "sms adapter misconfigured: {message}",
    }
}

/// Port for SMS delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Deliver a message to a phone number.
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<(), SmsError>;
}

/// Sender that silently accepts every message; used in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSmsSender;

#[async_trait]
impl SmsSender for FixtureSmsSender {
    async fn send(&self, _to: &PhoneNumber, _body: &str) -> Result<(), SmsError> {
        Ok(())
    }
}
