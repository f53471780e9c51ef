//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod address_repository;
mod address_service;
mod admin_repository;
mod auth_service;
mod booking_repository;
mod booking_service;
mod catalogue_repository;
mod client_repository;
mod content_repository;
mod coupon_repository;
mod coupon_service;
mod notification_publisher;
mod notification_repository;
mod notification_service;
mod sms_sender;
mod verification_code_repository;

#[cfg(test)]
pub use address_repository::MockAddressRepository;
pub use address_repository::{AddressRepository, AddressRepositoryError};
#[cfg(test)]
pub use address_service::MockAddressService;
pub use address_service::AddressService;
#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::{AdminAccount, AdminRepository, AdminRepositoryError};
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::AuthService;
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{
    BookingRepository, BookingRepositoryError, NewBooking, NewBookingItem,
};
#[cfg(test)]
pub use booking_service::MockBookingService;
pub use booking_service::BookingService;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
#[cfg(test)]
pub use client_repository::MockClientRepository;
pub use client_repository::{ClientRepository, ClientRepositoryError, NewClient};
#[cfg(test)]
pub use content_repository::MockContentRepository;
pub use content_repository::{
    ContentRepository, ContentRepositoryError, FixtureContentRepository,
};
#[cfg(test)]
pub use coupon_repository::MockCouponRepository;
pub use coupon_repository::{CouponRepository, CouponRepositoryError};
#[cfg(test)]
pub use coupon_service::MockCouponService;
pub use coupon_service::CouponService;
pub use notification_publisher::{NoOpNotificationPublisher, NotificationPublisher};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use notification_service::MockNotificationService;
pub use notification_service::NotificationService;
#[cfg(test)]
pub use sms_sender::MockSmsSender;
pub use sms_sender::{FixtureSmsSender, SmsError, SmsSender};
#[cfg(test)]
pub use verification_code_repository::MockVerificationCodeRepository;
pub use verification_code_repository::{
    NewVerificationCode, VerificationCodeRepository, VerificationCodeRepositoryError,
};
