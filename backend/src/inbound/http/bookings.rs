//! Booking API handlers for authenticated clients.
//!
//! ```text
//! POST /api/bookings              Create a booking from a cart
//! GET  /api/bookings              List own bookings with items
//! POST /api/bookings/{id}/cancel  Cancel an own booking
//! ```

use actix_web::{get, post, web};
use uuid::Uuid;

use crate::domain::{BookingWithItems, CreateBookingRequest, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, ok, ok_empty};
use crate::inbound::http::session::ClientSession;
use crate::inbound::http::state::HttpState;

/// Create a booking from the submitted cart.
///
/// Totals and unit prices are computed from the live catalogue server-side;
/// prices in the request body would be ignored and are not accepted.
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = BookingWithItems),
        (status = 400, description = "Invalid cart", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "A referenced knife type is unavailable", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    session: ClientSession,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<web::Json<Envelope<BookingWithItems>>> {
    let created = state
        .bookings
        .create_booking(&session.user_id, payload.into_inner())
        .await?;
    Ok(ok(created))
}

/// List the caller's bookings, newest first.
#[utoipa::path(
    get,
    path = "/api/bookings",
    responses(
        (status = 200, description = "Own bookings", body = [BookingWithItems]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    session: ClientSession,
) -> ApiResult<web::Json<Envelope<Vec<BookingWithItems>>>> {
    let bookings = state.bookings.list_for_user(&session.user_id).await?;
    Ok(ok(bookings))
}

/// Cancel one of the caller's bookings.
#[utoipa::path(
    post,
    path = "/api/bookings/{id}/cancel",
    params(("id" = Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such booking for this user", body = Error),
        (status = 409, description = "Booking can no longer be cancelled", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[post("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    session: ClientSession,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Envelope<()>>> {
    state
        .bookings
        .cancel_booking(path.into_inner(), &session.user_id)
        .await?;
    Ok(ok_empty())
}
