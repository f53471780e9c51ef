//! Actix middleware shared across inbound adapters.

pub mod trace;
