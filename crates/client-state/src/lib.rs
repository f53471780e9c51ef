//! Client-side state for Whetstone front-ends.
//!
//! Three concerns live here, mirroring what the booking front-end needs from
//! any UI shell:
//!
//! - [`session`]: the client session store, an explicit
//!   `Uninitialized -> Hydrating -> Ready` state machine published over a
//!   watch channel so consumers never render a false "logged out" state
//!   while persisted identity is still loading.
//! - [`cache`]: a hierarchical query cache with staleness windows,
//!   background polling, and the three-phase optimistic mutation protocol
//!   (snapshot, optimistic apply, rollback-or-reconcile).
//! - [`realtime`]: the notification bridge owning a per-user subscription
//!   handle, released deterministically on user change or shutdown.
//!
//! The [`gateway`] module defines the transport ports; [`http`] provides the
//! reqwest-backed implementation against the backend's REST API.

pub mod cache;
pub mod gateway;
pub mod http;
pub mod key;
pub mod realtime;
pub mod session;

pub use cache::{
    BOOKINGS_POLL_INTERVAL, CacheError, NOTIFICATIONS_POLL_INTERVAL, PollHandle, QueryCache,
};
pub use gateway::{AuthGateway, CodePurpose, GatewayError, Identity, IdentityStorage, MemoryStorage};
pub use http::HttpGateway;
pub use key::QueryKey;
pub use realtime::{NotificationEvent, NotificationFeed, RealtimeBridge};
pub use session::{SessionPhase, SessionSnapshot, SessionStore};
