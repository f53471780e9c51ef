//! Notification API handlers for authenticated clients.
//!
//! ```text
//! GET  /api/notifications               List own notifications
//! GET  /api/notifications/unread-count  Unread badge count
//! POST /api/notifications/{id}/read     Mark one read
//! POST /api/notifications/read-all      Mark all read
//! ```

use actix_web::{get, post, web};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::Notification;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, ok, ok_empty};
use crate::inbound::http::session::ClientSession;
use crate::inbound::http::state::HttpState;

/// Payload for the unread badge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    /// Number of unread notifications.
    pub count: i64,
}

/// List the caller's notifications, newest first.
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: ClientSession,
) -> ApiResult<web::Json<Envelope<Vec<Notification>>>> {
    let notifications = state
        .notifications
        .list_for_user(&session.user_id)
        .await?;
    Ok(ok(notifications))
}

/// Unread notification count for the badge.
#[get("/notifications/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    session: ClientSession,
) -> ApiResult<web::Json<Envelope<UnreadCount>>> {
    let count = state.notifications.unread_count(&session.user_id).await?;
    Ok(ok(UnreadCount { count }))
}

/// Mark one notification read.
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: ClientSession,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Envelope<()>>> {
    state
        .notifications
        .mark_read(path.into_inner(), &session.user_id)
        .await?;
    Ok(ok_empty())
}

/// Mark every notification read.
#[post("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: ClientSession,
) -> ApiResult<web::Json<Envelope<()>>> {
    state.notifications.mark_all_read(&session.user_id).await?;
    Ok(ok_empty())
}
