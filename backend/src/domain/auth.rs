//! Unified authentication service.
//!
//! Orchestrates the two identity providers (phone/OTP and username/password)
//! behind one use-case port, issues session tokens, and resolves verified
//! claims back to an identity by dispatching on the token kind. The service
//! holds no mutable state beyond what the repositories persist; throttle
//! counters are the only in-memory bookkeeping.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use super::error::Error;
use super::identity::{AdminId, AuthenticatedUser, ClientUser, UserId};
use super::phone::PhoneNumber;
use super::ports::{
    AdminRepository, AdminRepositoryError, AuthService, ClientRepository, ClientRepositoryError,
    NewClient, NewVerificationCode, SmsError, SmsSender, VerificationCodeRepository,
    VerificationCodeRepositoryError,
};
use super::throttle::AttemptThrottle;
use super::token::{IssuedToken, SessionClaims, SessionKind, TokenCodec};
use super::verification::{OtpPurpose, code_ttl, generate_code};

const MAX_NAME_CHARS: usize = 32;

/// Unified authentication service implementing the [`AuthService`] port.
#[derive(Clone)]
pub struct AuthServiceImpl {
    clients: Arc<dyn ClientRepository>,
    admins: Arc<dyn AdminRepository>,
    codes: Arc<dyn VerificationCodeRepository>,
    sms: Arc<dyn SmsSender>,
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
    throttle: AttemptThrottle,
}

impl AuthServiceImpl {
    /// Create the service with its collaborating ports.
    #[must_use]
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        admins: Arc<dyn AdminRepository>,
        codes: Arc<dyn VerificationCodeRepository>,
        sms: Arc<dyn SmsSender>,
        codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let throttle = AttemptThrottle::with_defaults(clock.clone());
        Self {
            clients,
            admins,
            codes,
            sms,
            codec,
            clock,
            throttle,
        }
    }

    fn issue_token(&self, subject: &str, kind: SessionKind) -> Result<IssuedToken, Error> {
        self.codec
            .issue(subject, kind, self.clock.utc())
            .map_err(|err| Error::internal(format!("failed to issue session token: {err}")))
    }

    /// Verify and consume the most recent live code for a phone.
    ///
    /// Consumption happens on code match regardless of what the caller does
    /// with the verified phone afterwards; a code is single-use even when the
    /// surrounding login or signup fails later.
    async fn consume_code(&self, phone: &PhoneNumber, candidate: &str) -> Result<(), Error> {
        self.throttle.check(phone.as_str())?;
        let latest = self
            .codes
            .latest_unused(phone)
            .await
            .map_err(map_code_error)?;
        let now = self.clock.utc();
        let live = latest
            .as_ref()
            .filter(|code| code.is_live(now) && code.matches(candidate));
        let Some(code) = live else {
            self.throttle.record_failure(phone.as_str());
            return Err(Error::unauthorized("invalid verification code"));
        };
        self.codes
            .mark_used(code.id)
            .await
            .map_err(map_code_error)?;
        self.throttle.clear(phone.as_str());
        Ok(())
    }
}

fn map_code_error(error: VerificationCodeRepositoryError) -> Error {
    match error {
        VerificationCodeRepositoryError::Connection { message } => {
            Error::service_unavailable(message)
        }
        VerificationCodeRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_client_error(error: ClientRepositoryError) -> Error {
    match error {
        ClientRepositoryError::Connection { message } => Error::service_unavailable(message),
        ClientRepositoryError::Query { message } => Error::internal(message),
        ClientRepositoryError::DuplicatePhone { .. } => {
            Error::conflict("phone number already registered")
        }
    }
}

fn map_admin_error(error: AdminRepositoryError) -> Error {
    match error {
        AdminRepositoryError::Connection { message } => Error::service_unavailable(message),
        AdminRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_sms_error(error: SmsError) -> Error {
    match error {
        SmsError::Delivery { message } => {
            Error::service_unavailable(format!("sms delivery failed: {message}"))
        }
        SmsError::Configuration { message } => {
            Error::internal(format!("sms adapter misconfigured: {message}"))
        }
    }
}

fn validate_name(name: &str) -> Result<String, Error> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request("name must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(Error::invalid_request(format!(
            "name must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn request_code(&self, phone: PhoneNumber, purpose: OtpPurpose) -> Result<(), Error> {
        let mut rng = SmallRng::from_entropy();
        let digits = generate_code(&mut rng);
        let expires_at = self.clock.utc() + code_ttl();
        let issued = self
            .codes
            .insert(NewVerificationCode {
                phone: phone.clone(),
                code: digits,
                purpose,
                expires_at,
            })
            .await
            .map_err(map_code_error)?;
        let body = format!(
            "Your verification code is {}. It expires in 5 minutes.",
            issued.code
        );
        self.sms.send(&phone, &body).await.map_err(map_sms_error)?;
        info!(purpose = purpose.as_str(), "verification code issued");
        Ok(())
    }

    async fn client_login(
        &self,
        phone: PhoneNumber,
        code: &str,
    ) -> Result<(ClientUser, IssuedToken), Error> {
        self.consume_code(&phone, code).await?;
        let user = self
            .clients
            .find_by_phone(&phone)
            .await
            .map_err(map_client_error)?
            .ok_or_else(|| Error::unauthorized("phone number is not registered"))?;
        let token = self.issue_token(&user.id.to_string(), SessionKind::Client)?;
        info!(user_id = %user.id, "client login");
        Ok((user, token))
    }

    async fn client_signup(
        &self,
        phone: PhoneNumber,
        name: &str,
        code: &str,
    ) -> Result<(ClientUser, IssuedToken), Error> {
        let name = validate_name(name)?;
        if self
            .clients
            .find_by_phone(&phone)
            .await
            .map_err(map_client_error)?
            .is_some()
        {
            return Err(Error::conflict("phone number already registered"));
        }
        self.consume_code(&phone, code).await?;
        let user = self
            .clients
            .create(NewClient { phone, name })
            .await
            .map_err(map_client_error)?;
        let token = self.issue_token(&user.id.to_string(), SessionKind::Client)?;
        info!(user_id = %user.id, "client signup");
        Ok((user, token))
    }

    async fn admin_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(super::identity::AdminUser, IssuedToken), Error> {
        self.throttle.check(username)?;
        let account = self
            .admins
            .find_by_username(username)
            .await
            .map_err(map_admin_error)?;
        let Some(account) = account else {
            self.throttle.record_failure(username);
            return Err(Error::unauthorized("invalid credentials"));
        };
        let verified = bcrypt::verify(password, &account.password_hash)
            .map_err(|err| Error::internal(format!("password verification failed: {err}")))?;
        if !verified {
            self.throttle.record_failure(username);
            return Err(Error::unauthorized("invalid credentials"));
        }
        self.throttle.clear(username);
        let token = self.issue_token(&account.admin.id.to_string(), SessionKind::Admin)?;
        info!(admin_id = %account.admin.id, "admin login");
        Ok((account.admin, token))
    }

    async fn current_user(&self, claims: &SessionClaims) -> Result<AuthenticatedUser, Error> {
        match claims.kind {
            SessionKind::Client => {
                let id = UserId::new(&claims.sub)
                    .map_err(|_| Error::unauthorized("invalid session subject"))?;
                let user = self
                    .clients
                    .find_by_id(&id)
                    .await
                    .map_err(map_client_error)?
                    .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
                Ok(AuthenticatedUser::Client(user))
            }
            SessionKind::Admin => {
                let id = AdminId::new(&claims.sub)
                    .map_err(|_| Error::unauthorized("invalid session subject"))?;
                let admin = self
                    .admins
                    .find_by_id(&id)
                    .await
                    .map_err(map_admin_error)?
                    .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
                Ok(AuthenticatedUser::Admin(admin))
            }
        }
    }
}
