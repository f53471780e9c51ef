//! Display-only content handlers: banners and payment bank accounts.

use actix_web::{get, web};

use crate::domain::ports::ContentRepositoryError;
use crate::domain::{Banner, Error, PaymentAccount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, ok};
use crate::inbound::http::state::HttpState;

fn map_content_error(error: ContentRepositoryError) -> Error {
    match error {
        ContentRepositoryError::Connection { message } => Error::service_unavailable(message),
        ContentRepositoryError::Query { message } => Error::internal(message),
    }
}

/// List active banners in display order.
#[get("/banners")]
pub async fn list_banners(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Envelope<Vec<Banner>>>> {
    let banners = state
        .content
        .list_banners()
        .await
        .map_err(map_content_error)?;
    Ok(ok(banners))
}

/// List the bank accounts shown on the payment page.
#[get("/payment-accounts")]
pub async fn list_payment_accounts(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Envelope<Vec<PaymentAccount>>>> {
    let accounts = state
        .content
        .list_payment_accounts()
        .await
        .map_err(map_content_error)?;
    Ok(ok(accounts))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use std::sync::Arc;

    use crate::domain::ports::FixtureContentRepository;
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{TestApp, default_ports};

    #[actix_web::test]
    async fn content_endpoints_are_public() {
        let ports = HttpStatePorts {
            content: Arc::new(FixtureContentRepository),
            ..default_ports()
        };
        let app = TestApp::with_ports(ports).await;

        assert_eq!(app.get("/api/banners").await.status(), StatusCode::OK);
        assert_eq!(
            app.get("/api/payment-accounts").await.status(),
            StatusCode::OK
        );
    }
}
