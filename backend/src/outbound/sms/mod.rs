//! SMS delivery adapters for verification codes.
//!
//! Three providers are supported, selected by configuration:
//! `console` logs the message (development), `twilio` and `aligo` deliver
//! over their HTTP APIs. Adapters own transport details only; message text
//! comes from the auth service.

mod aligo;
mod twilio;

pub use aligo::{AligoSettings, AligoSmsSender};
pub use twilio::{TwilioSettings, TwilioSmsSender};

use async_trait::async_trait;
use tracing::info;

use crate::domain::PhoneNumber;
use crate::domain::ports::{SmsError, SmsSender};

/// Development sender that writes the message to the log instead of a phone.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSmsSender;

#[async_trait]
impl SmsSender for ConsoleSmsSender {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<(), SmsError> {
        info!(to = %to, body, "console sms");
        Ok(())
    }
}
