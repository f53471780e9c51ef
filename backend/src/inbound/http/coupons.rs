//! Coupon handlers for authenticated clients.
//!
//! ```text
//! GET  /api/coupons               List own coupons
//! POST /api/coupons/{id}/redeem   Redeem a coupon (one-way)
//! ```

use actix_web::{get, post, web};
use uuid::Uuid;

use crate::domain::OwnedCoupon;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, ok, ok_empty};
use crate::inbound::http::session::ClientSession;
use crate::inbound::http::state::HttpState;

/// List the caller's coupons with template metadata.
#[get("/coupons")]
pub async fn list_coupons(
    state: web::Data<HttpState>,
    session: ClientSession,
) -> ApiResult<web::Json<Envelope<Vec<OwnedCoupon>>>> {
    let coupons = state.coupons.list(&session.user_id).await?;
    Ok(ok(coupons))
}

/// Redeem an owned coupon.
#[post("/coupons/{id}/redeem")]
pub async fn redeem_coupon(
    state: web::Data<HttpState>,
    session: ClientSession,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Envelope<()>>> {
    state
        .coupons
        .redeem(path.into_inner(), &session.user_id)
        .await?;
    Ok(ok_empty())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::domain::Error;
    use crate::domain::ports::MockCouponService;
    use crate::domain::UserId;
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{TestApp, default_ports};

    #[actix_web::test]
    async fn redeeming_a_used_coupon_conflicts() {
        let user = UserId::random();
        let mut coupons = MockCouponService::new();
        coupons
            .expect_redeem()
            .returning(|_, _| Err(Error::conflict("coupon already used or expired")));
        let ports = HttpStatePorts {
            coupons: Arc::new(coupons),
            ..default_ports()
        };
        let app = TestApp::with_ports(ports).await;

        let res = app
            .post_empty_with_client_cookie(
                &format!("/api/coupons/{}/redeem", Uuid::new_v4()),
                &user,
            )
            .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}
