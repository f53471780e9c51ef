//! Back-office handlers, guarded by the admin session cookie.
//!
//! ```text
//! GET    /api/admin/orders          All bookings with items
//! PATCH  /api/admin/orders/{id}     Overwrite a booking status
//! GET    /api/admin/products        All catalogue entries, active or not
//! POST   /api/admin/products        Create a catalogue entry
//! PUT    /api/admin/products/{id}   Update a catalogue entry
//! DELETE /api/admin/products/{id}   Soft-delete a catalogue entry
//! ```

use actix_web::{delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Booking, BookingStatus, BookingWithItems, Error, KnifeType, KnifeTypeUpdate, NewKnifeType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue::map_catalogue_error;
use crate::inbound::http::envelope::{Envelope, ok, ok_empty};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

/// Request body for `PATCH /api/admin/orders/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusBody {
    /// New status; any value of the booking status enum is accepted.
    pub status: String,
}

/// List every booking with items, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    responses(
        (status = 200, description = "All bookings", body = [BookingWithItems]),
        (status = 401, description = "Admin login required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    _session: AdminSession,
) -> ApiResult<web::Json<Envelope<Vec<BookingWithItems>>>> {
    let bookings = state.bookings.list_all().await?;
    Ok(ok(bookings))
}

/// Overwrite a booking's status.
///
/// The admin path is free-form: any enum value is accepted from any current
/// status. Unknown values fail validation before touching the store.
#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}",
    request_body = UpdateOrderStatusBody,
    params(("id" = Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Status updated", body = Booking),
        (status = 400, description = "Unknown status value", body = Error),
        (status = 401, description = "Admin login required", body = Error),
        (status = 404, description = "No such booking", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateOrderStatus"
)]
#[patch("/orders/{id}")]
pub async fn update_order_status(
    state: web::Data<HttpState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateOrderStatusBody>,
) -> ApiResult<web::Json<Envelope<Booking>>> {
    let status = BookingStatus::parse(&payload.status).ok_or_else(|| {
        Error::invalid_request(
            "status must be one of pending, confirmed, in_progress, completed, cancelled",
        )
    })?;
    let booking = state
        .bookings
        .update_status(path.into_inner(), status)
        .await?;
    Ok(ok(booking))
}

/// List every catalogue entry, including soft-deleted ones.
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    _session: AdminSession,
) -> ApiResult<web::Json<Envelope<Vec<KnifeType>>>> {
    let entries = state
        .catalogue
        .list_all()
        .await
        .map_err(map_catalogue_error)?;
    Ok(ok(entries))
}

fn validate_new_product(entry: &NewKnifeType) -> Result<(), Error> {
    if entry.name.trim().is_empty() {
        return Err(Error::invalid_request("product name must not be empty"));
    }
    if entry.market_price < 0 || entry.discount_price < 0 {
        return Err(Error::invalid_request("prices must not be negative"));
    }
    Ok(())
}

/// Create a catalogue entry.
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    _session: AdminSession,
    payload: web::Json<NewKnifeType>,
) -> ApiResult<web::Json<Envelope<KnifeType>>> {
    let entry = payload.into_inner();
    validate_new_product(&entry)?;
    let created = state
        .catalogue
        .insert(entry)
        .await
        .map_err(map_catalogue_error)?;
    Ok(ok(created))
}

/// Apply a partial update to a catalogue entry.
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
    payload: web::Json<KnifeTypeUpdate>,
) -> ApiResult<web::Json<Envelope<KnifeType>>> {
    let update = payload.into_inner();
    if update.market_price.is_some_and(|p| p < 0)
        || update.discount_price.is_some_and(|p| p < 0)
    {
        return Err(Error::invalid_request("prices must not be negative"));
    }
    let updated = state
        .catalogue
        .update(path.into_inner(), update)
        .await
        .map_err(map_catalogue_error)?
        .ok_or_else(|| Error::not_found("product not found"))?;
    Ok(ok(updated))
}

/// Soft-delete a catalogue entry.
///
/// Rows are never removed so historical booking items keep their reference;
/// the entry simply stops being orderable.
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Envelope<()>>> {
    let existed = state
        .catalogue
        .deactivate(path.into_inner())
        .await
        .map_err(map_catalogue_error)?;
    if !existed {
        return Err(Error::not_found("product not found"));
    }
    Ok(ok_empty())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{NaiveDate, Utc};
    use serde_json::Value;
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{MockBookingService, MockCatalogueRepository};
    use crate::domain::{AdminId, UserId};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{TestApp, admin_cookie, client_cookie, default_ports};

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            booking_date: NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
            booking_time: "14:00".into(),
            total_quantity: 1,
            total_amount: 5_000,
            status,
            special_instructions: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn admin_endpoints_reject_missing_cookie() {
        let app = TestApp::with_ports(default_ports()).await;
        assert_eq!(
            app.get("/api/admin/orders").await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn client_tokens_cannot_reach_admin_endpoints() {
        let app = TestApp::with_ports(default_ports()).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/admin/orders")
            .cookie(client_cookie(&UserId::random()))
            .to_request();
        let res = actix_test::call_service(app.service(), req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn unknown_status_values_fail_validation() {
        let app = TestApp::with_ports(default_ports()).await;
        let req = actix_test::TestRequest::patch()
            .uri(&format!("/api/admin/orders/{}", Uuid::new_v4()))
            .cookie(admin_cookie(&AdminId::random()))
            .set_json(UpdateOrderStatusBody {
                status: "shipped".into(),
            })
            .to_request();
        let res = actix_test::call_service(app.service(), req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn status_update_round_trips() {
        let mut bookings = MockBookingService::new();
        bookings
            .expect_update_status()
            .withf(|_, status| *status == BookingStatus::Confirmed)
            .returning(|_, status| Ok(booking(status)));
        let ports = HttpStatePorts {
            bookings: Arc::new(bookings),
            ..default_ports()
        };
        let app = TestApp::with_ports(ports).await;

        let req = actix_test::TestRequest::patch()
            .uri(&format!("/api/admin/orders/{}", Uuid::new_v4()))
            .cookie(admin_cookie(&AdminId::random()))
            .set_json(UpdateOrderStatusBody {
                status: "confirmed".into(),
            })
            .to_request();
        let res = actix_test::call_service(app.service(), req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.pointer("/data/status"),
            Some(&Value::String("confirmed".into()))
        );
    }

    #[actix_web::test]
    async fn product_create_validates_prices() {
        let app = TestApp::with_ports(default_ports()).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/admin/products")
            .cookie(admin_cookie(&AdminId::random()))
            .set_json(NewKnifeType {
                name: "Chef knife".into(),
                market_price: -1,
                discount_price: 0,
                image_url: None,
                display_order: 0,
            })
            .to_request();
        let res = actix_test::call_service(app.service(), req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn product_delete_is_a_soft_delete() {
        let mut catalogue = MockCatalogueRepository::new();
        catalogue.expect_deactivate().returning(|_| Ok(true));
        let ports = HttpStatePorts {
            catalogue: Arc::new(catalogue),
            ..default_ports()
        };
        let app = TestApp::with_ports(ports).await;

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/admin/products/{}", Uuid::new_v4()))
            .cookie(admin_cookie(&AdminId::random()))
            .to_request();
        let res = actix_test::call_service(app.service(), req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
