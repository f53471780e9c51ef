//! Driving port for the unified authentication use-cases.
//!
//! Inbound adapters call this port to authenticate either identity kind
//! without knowing the backing infrastructure, keeping HTTP handler tests
//! deterministic via test doubles.

use async_trait::async_trait;

use crate::domain::{
    AdminUser, AuthenticatedUser, ClientUser, Error, IssuedToken, OtpPurpose, PhoneNumber,
    SessionClaims,
};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Issue and deliver a one-time verification code for a phone.
    async fn request_code(&self, phone: PhoneNumber, purpose: OtpPurpose) -> Result<(), Error>;

    /// Verify a phone/code pair against an existing client account and issue
    /// a session token.
    async fn client_login(
        &self,
        phone: PhoneNumber,
        code: &str,
    ) -> Result<(ClientUser, IssuedToken), Error>;

    /// Verify a phone/code pair, create a new client account, and issue a
    /// session token.
    async fn client_signup(
        &self,
        phone: PhoneNumber,
        name: &str,
        code: &str,
    ) -> Result<(ClientUser, IssuedToken), Error>;

    /// Verify a username/password pair and issue an admin session token.
    async fn admin_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(AdminUser, IssuedToken), Error>;

    /// Resolve verified session claims to the identity they refer to,
    /// dispatching on the token kind.
    async fn current_user(&self, claims: &SessionClaims) -> Result<AuthenticatedUser, Error>;
}
