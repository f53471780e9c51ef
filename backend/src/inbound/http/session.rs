//! Session cookie helpers and request extractors.
//!
//! Tokens travel in kind-specific HttpOnly cookies (`auth-token` for clients,
//! `admin-token` for admins), SameSite=Strict, path `/`. Logout writes an
//! immediately expiring empty cookie to the same name and path; there is no
//! server-side revocation list.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::domain::{
    AdminId, Error, IssuedToken, SessionClaims, SessionKind, TokenError, UserId,
};

use super::state::HttpState;

/// Cookie carrying the client session token.
pub const CLIENT_TOKEN_COOKIE: &str = "auth-token";

/// Cookie carrying the admin session token.
pub const ADMIN_TOKEN_COOKIE: &str = "admin-token";

/// Cookie name for a session kind.
#[must_use]
pub fn cookie_name(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Client => CLIENT_TOKEN_COOKIE,
        SessionKind::Admin => ADMIN_TOKEN_COOKIE,
    }
}

/// Build the session cookie paired with a freshly issued token.
#[must_use]
pub fn session_cookie(issued: &IssuedToken, secure: bool) -> Cookie<'static> {
    Cookie::build(cookie_name(issued.kind), issued.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(CookieDuration::seconds(issued.kind.ttl().num_seconds()))
        .finish()
}

/// Build the immediately expiring cookie written on logout.
#[must_use]
pub fn expired_cookie(kind: SessionKind, secure: bool) -> Cookie<'static> {
    Cookie::build(cookie_name(kind), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(CookieDuration::ZERO)
        .finish()
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Expired => Error::unauthorized("session has expired"),
        TokenError::WrongKind { .. } => Error::unauthorized("wrong session kind"),
        TokenError::Malformed | TokenError::InvalidSignature => {
            Error::unauthorized("invalid session token")
        }
        TokenError::Issuance { message } => Error::internal(message),
    }
}

fn verify_cookie(req: &HttpRequest, kind: SessionKind) -> Result<SessionClaims, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state not configured"))?;
    let cookie = req
        .cookie(cookie_name(kind))
        .ok_or_else(|| Error::unauthorized("login required"))?;
    state
        .codec
        .verify_kind(cookie.value(), kind)
        .map_err(map_token_error)
}

/// Extractor requiring a valid client session cookie.
#[derive(Debug, Clone)]
pub struct ClientSession {
    /// Authenticated client id from the token subject.
    pub user_id: UserId,
    /// Full verified claims.
    pub claims: SessionClaims,
}

impl FromRequest for ClientSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = verify_cookie(req, SessionKind::Client).and_then(|claims| {
            let user_id = UserId::new(&claims.sub)
                .map_err(|_| Error::unauthorized("invalid session subject"))?;
            Ok(Self { user_id, claims })
        });
        ready(result)
    }
}

/// Extractor requiring a valid admin session cookie.
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// Authenticated admin id from the token subject.
    pub admin_id: AdminId,
    /// Full verified claims.
    pub claims: SessionClaims,
}

impl FromRequest for AdminSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = verify_cookie(req, SessionKind::Admin).and_then(|claims| {
            let admin_id = AdminId::new(&claims.sub)
                .map_err(|_| Error::unauthorized("invalid session subject"))?;
            Ok(Self { admin_id, claims })
        });
        ready(result)
    }
}

/// Verified claims from whichever session cookie is present.
///
/// `GET /api/auth/me` serves both identity kinds; the client cookie is
/// consulted first, then the admin cookie.
pub fn any_session(req: &HttpRequest) -> Result<SessionClaims, Error> {
    match verify_cookie(req, SessionKind::Client) {
        Ok(claims) => Ok(claims),
        Err(client_err) => match verify_cookie(req, SessionKind::Admin) {
            Ok(claims) => Ok(claims),
            Err(_) => Err(client_err),
        },
    }
}
