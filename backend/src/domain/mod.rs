//! Domain primitives, aggregates, services, and ports.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers, the use-case services orchestrating them, and the
//! ports that adapters implement. Types are immutable where practical and
//! document their invariants and serde contracts in Rustdoc.

pub mod address;
pub mod address_service;
pub mod auth;
pub mod booking;
pub mod booking_service;
pub mod catalogue;
pub mod content;
pub mod coupon;
pub mod coupon_service;
pub mod error;
pub mod identity;
pub mod notification;
pub mod notification_service;
pub mod phone;
pub mod ports;
pub mod throttle;
pub mod token;
pub mod trace_id;
pub mod verification;

pub use self::address::{Address, AddressKind, AddressUpdate, NewAddress};
pub use self::address_service::AddressServiceImpl;
pub use self::auth::AuthServiceImpl;
pub use self::booking::{
    Booking, BookingItem, BookingLine, BookingStatus, BookingWithItems, CreateBookingRequest,
};
pub use self::booking_service::BookingServiceImpl;
pub use self::catalogue::{KnifeType, KnifeTypeUpdate, NewKnifeType};
pub use self::content::{Banner, PaymentAccount};
pub use self::coupon::{CouponType, OwnedCoupon, UserCoupon};
pub use self::coupon_service::CouponServiceImpl;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{
    AdminId, AdminRole, AdminUser, AuthenticatedUser, ClientUser, IdValidationError, UserId,
};
pub use self::notification::{NewNotification, Notification, NotificationKind};
pub use self::notification_service::NotificationServiceImpl;
pub use self::phone::{PhoneNumber, PhoneValidationError};
pub use self::ports::{
    AddressService, AuthService, BookingService, CouponService, NotificationService,
};
pub use self::throttle::AttemptThrottle;
pub use self::token::{IssuedToken, SessionClaims, SessionKind, TokenCodec, TokenError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::verification::{OtpPurpose, VerificationCode};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
