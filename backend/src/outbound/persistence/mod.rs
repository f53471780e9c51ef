//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: all database errors are mapped to domain
//!   port error types.

mod diesel_address_repository;
mod diesel_admin_repository;
mod diesel_booking_repository;
mod diesel_catalogue_repository;
mod diesel_client_repository;
mod diesel_content_repository;
mod diesel_coupon_repository;
pub(crate) mod diesel_error_mapping;
mod diesel_notification_repository;
mod diesel_verification_code_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_address_repository::DieselAddressRepository;
pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_client_repository::DieselClientRepository;
pub use diesel_content_repository::DieselContentRepository;
pub use diesel_coupon_repository::DieselCouponRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_verification_code_repository::DieselVerificationCodeRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
