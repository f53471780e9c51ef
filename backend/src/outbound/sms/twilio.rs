//! Reqwest-backed Twilio SMS adapter.
//!
//! This adapter owns transport details only: request form encoding, basic
//! auth, timeout, and HTTP error mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::PhoneNumber;
use crate::domain::ports::{SmsError, SmsSender};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Credentials and sender identity for the Twilio API.
#[derive(Debug, Clone)]
pub struct TwilioSettings {
    /// Account SID.
    pub account_sid: String,
    /// Auth token.
    pub auth_token: String,
    /// E.164 sender number.
    pub from_number: String,
}

/// Twilio SMS adapter performing HTTP POSTs against the Messages endpoint.
pub struct TwilioSmsSender {
    client: Client,
    settings: TwilioSettings,
}

impl TwilioSmsSender {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    /// Returns [`SmsError::Configuration`] when the HTTP client cannot be
    /// constructed.
    pub fn new(settings: TwilioSettings) -> Result<Self, SmsError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| SmsError::configuration(err.to_string()))?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<(), SmsError> {
        let url = format!(
            "{API_BASE}/Accounts/{}/Messages.json",
            self.settings.account_sid
        );
        let params = [
            ("To", to.as_str()),
            ("From", self.settings.from_number.as_str()),
            ("Body", body),
        ];
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|err| SmsError::delivery(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(SmsError::delivery(format!(
                "twilio responded {status}: {detail}"
            )))
        }
    }
}
