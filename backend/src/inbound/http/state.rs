//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::TokenCodec;
use crate::domain::ports::{
    AddressService, AuthService, BookingService, CatalogueRepository, ContentRepository,
    CouponService, NotificationService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Unified authentication use-cases.
    pub auth: Arc<dyn AuthService>,
    /// Booking workflow use-cases.
    pub bookings: Arc<dyn BookingService>,
    /// Notification use-cases.
    pub notifications: Arc<dyn NotificationService>,
    /// Address use-cases.
    pub addresses: Arc<dyn AddressService>,
    /// Coupon use-cases.
    pub coupons: Arc<dyn CouponService>,
    /// Catalogue reads and admin product mutations.
    pub catalogue: Arc<dyn CatalogueRepository>,
    /// Display-only content reads.
    pub content: Arc<dyn ContentRepository>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Unified authentication use-cases.
    pub auth: Arc<dyn AuthService>,
    /// Booking workflow use-cases.
    pub bookings: Arc<dyn BookingService>,
    /// Notification use-cases.
    pub notifications: Arc<dyn NotificationService>,
    /// Address use-cases.
    pub addresses: Arc<dyn AddressService>,
    /// Coupon use-cases.
    pub coupons: Arc<dyn CouponService>,
    /// Catalogue reads and admin product mutations.
    pub catalogue: Arc<dyn CatalogueRepository>,
    /// Display-only content reads.
    pub content: Arc<dyn ContentRepository>,
    /// Session token codec used by the cookie extractors.
    pub codec: Arc<TokenCodec>,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
}

impl HttpState {
    /// Construct state from a ports bundle plus the session settings.
    #[must_use]
    pub fn new(ports: HttpStatePorts, codec: Arc<TokenCodec>, cookie_secure: bool) -> Self {
        let HttpStatePorts {
            auth,
            bookings,
            notifications,
            addresses,
            coupons,
            catalogue,
            content,
        } = ports;
        Self {
            auth,
            bookings,
            notifications,
            addresses,
            coupons,
            catalogue,
            content,
            codec,
            cookie_secure,
        }
    }
}
