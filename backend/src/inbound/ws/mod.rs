//! WebSocket inbound adapter: the per-user realtime notification feed.
//!
//! Responsibilities:
//! - authenticate the upgrade request via the client session cookie
//! - bridge the in-process notification hub onto the socket as JSON frames
//! - keep WebSocket framing and heartbeats at the edge of the system
//!
//! The subscription lives exactly as long as the connection: dropping the
//! broadcast receiver when the session loop exits releases the per-user
//! channel deterministically.

pub mod state;

use std::time::{Duration, Instant};

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use actix_ws::{Message, MessageStream, Session};
use tokio::sync::broadcast;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::{Error, Notification, SessionKind, UserId};

use state::WsState;

/// Time between heartbeats to the client.
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client.
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

/// Handle WebSocket upgrade for the notification feed.
///
/// The upgrade request authenticates exactly like a REST call: a valid
/// `auth-token` cookie of the client kind.
#[get("/ws/notifications")]
pub async fn notifications_feed(
    ws_state: web::Data<WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let cookie = req
        .cookie("auth-token")
        .ok_or_else(|| Error::unauthorized("login required"))?;
    let claims = ws_state
        .codec
        .verify_kind(cookie.value(), SessionKind::Client)
        .map_err(|_| Error::unauthorized("invalid session token"))?;
    let user_id =
        UserId::new(&claims.sub).map_err(|_| Error::unauthorized("invalid session subject"))?;

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;
    let events = ws_state.hub.subscribe(&user_id);
    actix_web::rt::spawn(run_feed(user_id, session, msg_stream, events));
    Ok(response)
}

enum FeedEnd {
    ClientClosed,
    StreamClosed,
    HeartbeatTimeout,
    SendFailed,
}

async fn run_feed(
    user_id: UserId,
    mut session: Session,
    mut stream: MessageStream,
    mut events: broadcast::Receiver<Notification>,
) {
    let mut last_heartbeat = Instant::now();
    let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

    let end = loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if Instant::now().duration_since(last_heartbeat) > CLIENT_TIMEOUT {
                    break FeedEnd::HeartbeatTimeout;
                }
                if session.ping(b"").await.is_err() {
                    break FeedEnd::SendFailed;
                }
            }
            event = events.recv() => {
                match event {
                    Ok(notification) => {
                        if forward(&mut session, &notification).await.is_err() {
                            break FeedEnd::SendFailed;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // The client refetches from the REST API after any
                        // gap, so dropped events only cost freshness.
                        warn!(%user_id, skipped, "notification feed lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break FeedEnd::StreamClosed,
                }
            }
            message = stream.recv() => {
                match message {
                    Some(Ok(Message::Ping(bytes))) => {
                        last_heartbeat = Instant::now();
                        if session.pong(&bytes).await.is_err() {
                            break FeedEnd::SendFailed;
                        }
                    }
                    Some(Ok(Message::Pong(_) | Message::Text(_) | Message::Binary(_))) => {
                        last_heartbeat = Instant::now();
                    }
                    Some(Ok(Message::Close(_))) | None => break FeedEnd::ClientClosed,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break FeedEnd::StreamClosed,
                }
            }
        }
    };

    match end {
        FeedEnd::ClientClosed => debug!(%user_id, "notification feed closed by client"),
        FeedEnd::StreamClosed => debug!(%user_id, "notification feed stream ended"),
        FeedEnd::HeartbeatTimeout => debug!(%user_id, "notification feed timed out"),
        FeedEnd::SendFailed => debug!(%user_id, "notification feed send failed"),
    }
    let _ = session.close(None).await;
}

async fn forward(session: &mut Session, notification: &Notification) -> Result<(), ()> {
    let payload = serde_json::to_string(notification).map_err(|err| {
        warn!(error = %err, "failed to encode notification frame");
    })?;
    session.text(payload).await.map_err(|_| ())
}
