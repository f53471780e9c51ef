//! Reqwest-backed gateway against the backend REST API.
//!
//! Owns transport details only: JSON encoding, the `{success, ...}` response
//! envelope, the cookie store carrying the session token, and error mapping.
//! The session cookie is HttpOnly end to end; this client never inspects it,
//! it only lets the cookie store replay it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;

use crate::gateway::{AuthGateway, CodePurpose, GatewayError, Identity};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct FailureEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: Identity,
}

/// HTTP implementation of the [`AuthGateway`] port.
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    /// Build a gateway rooted at the backend base URL.
    ///
    /// # Errors
    /// Returns [`GatewayError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(base: Url) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base
            .join(path)
            .map_err(|err| GatewayError::transport(err.to_string()))
    }

    async fn reject(response: Response) -> GatewayError {
        let status = response.status();
        match response.json::<FailureEnvelope>().await {
            Ok(FailureEnvelope { error: Some(error) }) => {
                GatewayError::rejected(error.code, error.message)
            }
            _ => GatewayError::rejected(status.as_str().to_owned(), "request failed"),
        }
    }

    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Response, GatewayError> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::reject(response).await)
        }
    }

    async fn decode_user(response: Response) -> Result<Identity, GatewayError> {
        response
            .json::<UserEnvelope>()
            .await
            .map(|envelope| envelope.user)
            .map_err(|err| GatewayError::decode(err.to_string()))
    }
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn request_code(&self, phone: &str, purpose: CodePurpose) -> Result<(), GatewayError> {
        self.post_json(
            "api/auth/client/request-code",
            json!({ "phone": phone, "purpose": purpose.as_str() }),
        )
        .await
        .map(|_| ())
    }

    async fn client_login(&self, phone: &str, code: &str) -> Result<Identity, GatewayError> {
        let response = self
            .post_json(
                "api/auth/client/login",
                json!({ "phone": phone, "verificationCode": code }),
            )
            .await?;
        Self::decode_user(response).await
    }

    async fn client_signup(
        &self,
        phone: &str,
        name: &str,
        code: &str,
    ) -> Result<Identity, GatewayError> {
        let response = self
            .post_json(
                "api/auth/client/signup",
                json!({ "phone": phone, "name": name, "verificationCode": code }),
            )
            .await?;
        Self::decode_user(response).await
    }

    async fn current_user(&self) -> Result<Option<Identity>, GatewayError> {
        let url = self.endpoint("api/auth/me")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        match response.status() {
            status if status.is_success() => Self::decode_user(response).await.map(Some),
            StatusCode::UNAUTHORIZED => Ok(None),
            _ => Err(Self::reject(response).await),
        }
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        self.post_json("api/auth/logout", json!({})).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    //! Decoding coverage; transport behaviour is exercised against the real
    //! backend in its integration suite.
    use super::*;

    #[test]
    fn failure_envelope_decodes_the_error_field() {
        let envelope: FailureEnvelope = serde_json::from_str(
            r#"{"success":false,"error":{"code":"unauthorized","message":"invalid verification code"}}"#,
        )
        .expect("decode");
        let error = envelope.error.expect("error present");
        assert_eq!(error.code, "unauthorized");
    }

    #[test]
    fn user_envelope_decodes_the_tagged_identity() {
        let envelope: UserEnvelope = serde_json::from_str(
            r#"{"success":true,"user":{"type":"client","id":"u-1","phone":"01012345678","name":"Jihye","createdAt":"2025-01-01T00:00:00Z"}}"#,
        )
        .expect("decode");
        assert_eq!(envelope.user.id(), "u-1");
    }
}
