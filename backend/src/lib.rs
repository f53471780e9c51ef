//! Whetstone backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` owns entities, services,
//! and ports; `inbound` adapts HTTP and WebSocket traffic onto the driving
//! ports; `outbound` implements the driven ports against PostgreSQL and the
//! SMS gateways.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use domain::TraceId;
pub use middleware::trace::Trace;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
