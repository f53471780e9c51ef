//! Address book handlers for authenticated clients.
//!
//! ```text
//! GET    /api/addresses               List own addresses
//! POST   /api/addresses               Create an address
//! PUT    /api/addresses/{id}          Update an address
//! DELETE /api/addresses/{id}          Delete an address
//! POST   /api/addresses/{id}/default  Promote the single default
//! ```

use actix_web::{delete, get, post, put, web};
use uuid::Uuid;

use crate::domain::{Address, AddressUpdate, NewAddress};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, ok, ok_empty};
use crate::inbound::http::session::ClientSession;
use crate::inbound::http::state::HttpState;

/// List the caller's addresses, default first.
#[get("/addresses")]
pub async fn list_addresses(
    state: web::Data<HttpState>,
    session: ClientSession,
) -> ApiResult<web::Json<Envelope<Vec<Address>>>> {
    let addresses = state.addresses.list(&session.user_id).await?;
    Ok(ok(addresses))
}

/// Create an address; a default flag here demotes any previous default.
#[post("/addresses")]
pub async fn create_address(
    state: web::Data<HttpState>,
    session: ClientSession,
    payload: web::Json<NewAddress>,
) -> ApiResult<web::Json<Envelope<Address>>> {
    let address = state
        .addresses
        .create(&session.user_id, payload.into_inner())
        .await?;
    Ok(ok(address))
}

/// Apply a partial update to an owned address.
#[put("/addresses/{id}")]
pub async fn update_address(
    state: web::Data<HttpState>,
    session: ClientSession,
    path: web::Path<Uuid>,
    payload: web::Json<AddressUpdate>,
) -> ApiResult<web::Json<Envelope<Address>>> {
    let address = state
        .addresses
        .update(path.into_inner(), &session.user_id, payload.into_inner())
        .await?;
    Ok(ok(address))
}

/// Delete an owned address.
#[delete("/addresses/{id}")]
pub async fn delete_address(
    state: web::Data<HttpState>,
    session: ClientSession,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Envelope<()>>> {
    state
        .addresses
        .delete(path.into_inner(), &session.user_id)
        .await?;
    Ok(ok_empty())
}

/// Promote an owned address to the single default.
#[post("/addresses/{id}/default")]
pub async fn set_default_address(
    state: web::Data<HttpState>,
    session: ClientSession,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Envelope<Address>>> {
    let address = state
        .addresses
        .set_default(path.into_inner(), &session.user_id)
        .await?;
    Ok(ok(address))
}
