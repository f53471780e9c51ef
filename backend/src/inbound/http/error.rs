//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the `{success:false, error}`
//! envelope with consistent status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: Error,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(ErrorBody {
            success: false,
            error: redact_if_internal(self),
        })
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(Error::invalid_request("bad"), 400)]
    #[case(Error::unauthorized("nope"), 401)]
    #[case(Error::forbidden("denied"), 403)]
    #[case(Error::not_found("missing"), 404)]
    #[case(Error::conflict("duplicate"), 409)]
    #[case(Error::service_unavailable("down"), 503)]
    #[case(Error::internal("boom"), 500)]
    fn status_codes_follow_the_taxonomy(#[case] error: Error, #[case] expected: u16) {
        assert_eq!(error.status_code().as_u16(), expected);
    }

    #[actix_web::test]
    async fn responses_use_the_failure_envelope() {
        let response = Error::not_found("booking not found").error_response();
        let body = actix_web::body::to_bytes(response.into_body())
            .await
            .expect("body bytes");
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value.get("success"), Some(&Value::Bool(false)));
        assert_eq!(
            value.pointer("/error/code"),
            Some(&Value::String("not_found".into()))
        );
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let response = Error::internal("database password wrong").error_response();
        let body = actix_web::body::to_bytes(response.into_body())
            .await
            .expect("body bytes");
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(
            value.pointer("/error/message"),
            Some(&Value::String("Internal server error".into()))
        );
    }
}
