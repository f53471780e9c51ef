//! Success envelope shared by every HTTP endpoint.
//!
//! All responses use the `{success, data?|user?, error?}` contract; failures
//! are rendered by the [`ResponseError`](actix_web::ResponseError) impl in
//! [`super::error`].

use actix_web::web;
use serde::Serialize;

use crate::domain::AuthenticatedUser;

/// Success envelope carrying a payload under `data`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    /// Always true on the success path.
    pub success: bool,
    /// Endpoint-specific payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Success envelope used by authentication endpoints, which return the
/// identity under `user` rather than `data`.
#[derive(Debug, Clone, Serialize)]
pub struct UserEnvelope {
    /// Always true on the success path.
    pub success: bool,
    /// The authenticated identity, tagged by kind.
    pub user: AuthenticatedUser,
}

/// Wrap a payload in the success envelope.
pub fn ok<T: Serialize>(data: T) -> web::Json<Envelope<T>> {
    web::Json(Envelope {
        success: true,
        data: Some(data),
    })
}

/// Success with no payload.
#[must_use]
pub fn ok_empty() -> web::Json<Envelope<()>> {
    web::Json(Envelope {
        success: true,
        data: None,
    })
}
