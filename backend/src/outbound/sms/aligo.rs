//! Reqwest-backed Aligo (smartSMS) adapter.
//!
//! Aligo is the Korean bulk-SMS gateway the service uses in production. The
//! API accepts form-encoded POSTs and reports success through a JSON
//! `result_code` field rather than the HTTP status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::PhoneNumber;
use crate::domain::ports::{SmsError, SmsSender};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const SEND_ENDPOINT: &str = "https://apis.aligo.in/send/";

/// Credentials and sender identity for the Aligo API.
#[derive(Debug, Clone)]
pub struct AligoSettings {
    /// API key issued by Aligo.
    pub api_key: String,
    /// Aligo account id.
    pub user_id: String,
    /// Registered sender number.
    pub sender: String,
}

#[derive(Debug, Deserialize)]
struct AligoResponse {
    result_code: serde_json::Value,
    #[serde(default)]
    message: String,
}

impl AligoResponse {
    /// Aligo signals success with result_code 1, returned as either a number
    /// or a string depending on the endpoint.
    fn is_success(&self) -> bool {
        match &self.result_code {
            serde_json::Value::Number(n) => n.as_i64() == Some(1),
            serde_json::Value::String(s) => s == "1",
            _ => false,
        }
    }
}

/// Aligo SMS adapter performing HTTP POSTs against the send endpoint.
pub struct AligoSmsSender {
    client: Client,
    settings: AligoSettings,
}

impl AligoSmsSender {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    /// Returns [`SmsError::Configuration`] when the HTTP client cannot be
    /// constructed.
    pub fn new(settings: AligoSettings) -> Result<Self, SmsError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| SmsError::configuration(err.to_string()))?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl SmsSender for AligoSmsSender {
    async fn send(&self, to: &PhoneNumber, body: &str) -> Result<(), SmsError> {
        let params = [
            ("key", self.settings.api_key.as_str()),
            ("user_id", self.settings.user_id.as_str()),
            ("sender", self.settings.sender.as_str()),
            ("receiver", to.as_str()),
            ("msg", body),
        ];
        let response = self
            .client
            .post(SEND_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|err| SmsError::delivery(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SmsError::delivery(format!("aligo responded {status}")));
        }
        let parsed: AligoResponse = response
            .json()
            .await
            .map_err(|err| SmsError::delivery(format!("aligo response undecodable: {err}")))?;
        if parsed.is_success() {
            Ok(())
        } else {
            Err(SmsError::delivery(format!(
                "aligo rejected message: {}",
                parsed.message
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for response decoding.
    use super::*;

    #[test]
    fn result_code_accepts_number_and_string_forms() {
        let numeric: AligoResponse =
            serde_json::from_str(r#"{"result_code":1,"message":"ok"}"#).expect("decode");
        assert!(numeric.is_success());

        let string: AligoResponse =
            serde_json::from_str(r#"{"result_code":"1","message":"ok"}"#).expect("decode");
        assert!(string.is_success());

        let failed: AligoResponse =
            serde_json::from_str(r#"{"result_code":-101,"message":"bad key"}"#).expect("decode");
        assert!(!failed.is_success());
    }
}
