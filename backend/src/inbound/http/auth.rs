//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/client/request-code {"phone":"01012345678","purpose":"signup"}
//! POST /api/auth/client/login       {"phone":"01012345678","verificationCode":"123456"}
//! POST /api/auth/client/signup      {"phone":"...","name":"...","verificationCode":"..."}
//! POST /api/auth/admin/login        {"username":"...","password":"..."}
//! GET  /api/auth/me
//! POST /api/auth/logout
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthenticatedUser, Error, OtpPurpose, PhoneNumber, SessionKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, UserEnvelope, ok_empty};
use crate::inbound::http::session::{any_session, expired_cookie, session_cookie};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/auth/client/request-code`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestCodeBody {
    /// Phone number to deliver the code to.
    pub phone: String,
    /// `signup` or `login`; defaults to `login`.
    #[serde(default)]
    pub purpose: Option<String>,
}

/// Request body for `POST /api/auth/client/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientLoginBody {
    /// Phone number the code was sent to.
    pub phone: String,
    /// The received one-time code.
    pub verification_code: String,
}

/// Request body for `POST /api/auth/client/signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSignupBody {
    /// Phone number the code was sent to.
    pub phone: String,
    /// Display name for the new account.
    pub name: String,
    /// The received one-time code.
    pub verification_code: String,
}

/// Request body for `POST /api/auth/admin/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginBody {
    /// Admin login name.
    pub username: String,
    /// Admin password.
    pub password: String,
}

fn parse_phone(raw: &str) -> Result<PhoneNumber, Error> {
    PhoneNumber::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

fn parse_purpose(raw: Option<&str>) -> Result<OtpPurpose, Error> {
    match raw {
        None => Ok(OtpPurpose::Login),
        Some(value) => OtpPurpose::parse(value)
            .ok_or_else(|| Error::invalid_request("purpose must be signup or login")),
    }
}

/// Issue and deliver a one-time verification code.
#[utoipa::path(
    post,
    path = "/api/auth/client/request-code",
    request_body = RequestCodeBody,
    responses(
        (status = 200, description = "Code issued and sent"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Too many attempts", body = Error)
    ),
    tags = ["auth"],
    operation_id = "requestVerificationCode",
    security([])
)]
#[post("/client/request-code")]
pub async fn request_code(
    state: web::Data<HttpState>,
    payload: web::Json<RequestCodeBody>,
) -> ApiResult<web::Json<Envelope<()>>> {
    let body = payload.into_inner();
    let phone = parse_phone(&body.phone)?;
    let purpose = parse_purpose(body.purpose.as_deref())?;
    state.auth.request_code(phone, purpose).await?;
    Ok(ok_empty())
}

/// Authenticate a client by phone and verification code.
#[utoipa::path(
    post,
    path = "/api/auth/client/login",
    request_body = ClientLoginBody,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Client session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid verification code", body = Error)
    ),
    tags = ["auth"],
    operation_id = "clientLogin",
    security([])
)]
#[post("/client/login")]
pub async fn client_login(
    state: web::Data<HttpState>,
    payload: web::Json<ClientLoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let phone = parse_phone(&body.phone)?;
    let (user, token) = state
        .auth
        .client_login(phone, &body.verification_code)
        .await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, state.cookie_secure))
        .json(UserEnvelope {
            success: true,
            user: AuthenticatedUser::Client(user),
        }))
}

/// Create a client account from a verified phone.
#[utoipa::path(
    post,
    path = "/api/auth/client/signup",
    request_body = ClientSignupBody,
    responses(
        (status = 200, description = "Signup success", headers(("Set-Cookie" = String, description = "Client session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid verification code", body = Error),
        (status = 409, description = "Phone already registered", body = Error)
    ),
    tags = ["auth"],
    operation_id = "clientSignup",
    security([])
)]
#[post("/client/signup")]
pub async fn client_signup(
    state: web::Data<HttpState>,
    payload: web::Json<ClientSignupBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let phone = parse_phone(&body.phone)?;
    let (user, token) = state
        .auth
        .client_signup(phone, &body.name, &body.verification_code)
        .await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, state.cookie_secure))
        .json(UserEnvelope {
            success: true,
            user: AuthenticatedUser::Client(user),
        }))
}

/// Authenticate an admin by username and password.
#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    request_body = AdminLoginBody,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Admin session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    payload: web::Json<AdminLoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(Error::invalid_request(
            "username and password must not be empty",
        ));
    }
    let (admin, token) = state.auth.admin_login(&body.username, &body.password).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, state.cookie_secure))
        .json(UserEnvelope {
            success: true,
            user: AuthenticatedUser::Admin(admin),
        }))
}

/// Resolve the identity behind whichever session cookie is present.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current identity"),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn me(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let claims = any_session(&req)?;
    let user = state.auth.current_user(&claims).await?;
    Ok(HttpResponse::Ok().json(UserEnvelope {
        success: true,
        user,
    }))
}

/// Clear both session cookies.
///
/// The only supported invalidation mechanism: tokens themselves stay valid
/// until natural expiry.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Cookies cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(expired_cookie(SessionKind::Client, state.cookie_secure))
        .cookie(expired_cookie(SessionKind::Admin, state.cookie_secure))
        .json(Envelope::<()> {
            success: true,
            data: None,
        }))
}
