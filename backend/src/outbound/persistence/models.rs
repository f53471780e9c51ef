//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types validate the
//! stored enum strings; a bad row surfaces as a query error rather than a
//! panic.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Address, AddressKind, AdminRole, AdminUser, Banner, Booking, BookingItem, BookingStatus,
    ClientUser, CouponType, KnifeType, Notification, NotificationKind, OtpPurpose, PaymentAccount,
    PhoneNumber, UserCoupon, VerificationCode,
};
use crate::domain::{AdminId, UserId};

use super::schema::{
    admins, banners, booking_items, bookings, coupon_types, knife_types, notifications,
    payment_bank_accounts, user_addresses, user_coupons, users, verification_codes,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field not surfaced on the domain type")]
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<ClientUser, String> {
        let phone = PhoneNumber::new(&self.phone)
            .map_err(|err| format!("invalid stored phone number: {err}"))?;
        Ok(ClientUser {
            id: UserId::from_uuid(self.id),
            phone,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub phone: &'a str,
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// Admins
// ---------------------------------------------------------------------------

/// Row struct for reading from the admins table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    #[expect(dead_code, reason = "schema field not surfaced on the domain type")]
    pub created_at: DateTime<Utc>,
}

impl AdminRow {
    pub(crate) fn into_domain(self) -> Result<(AdminUser, String), String> {
        let role = AdminRole::parse(&self.role)
            .ok_or_else(|| format!("invalid stored admin role: {}", self.role))?;
        Ok((
            AdminUser {
                id: AdminId::from_uuid(self.id),
                username: self.username,
                name: self.name,
                role,
            },
            self.password_hash,
        ))
    }
}

// ---------------------------------------------------------------------------
// Verification codes
// ---------------------------------------------------------------------------

/// Row struct for reading from the verification_codes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = verification_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VerificationCodeRow {
    pub id: Uuid,
    pub phone: String,
    pub code: String,
    pub purpose: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl VerificationCodeRow {
    pub(crate) fn into_domain(self) -> Result<VerificationCode, String> {
        let phone = PhoneNumber::new(&self.phone)
            .map_err(|err| format!("invalid stored phone number: {err}"))?;
        let purpose = OtpPurpose::parse(&self.purpose)
            .ok_or_else(|| format!("invalid stored code purpose: {}", self.purpose))?;
        Ok(VerificationCode {
            id: self.id,
            phone,
            code: self.code,
            purpose,
            expires_at: self.expires_at,
            used: self.used,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for issuing verification codes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = verification_codes)]
pub(crate) struct NewVerificationCodeRow<'a> {
    pub id: Uuid,
    pub phone: &'a str,
    pub code: &'a str,
    pub purpose: &'a str,
    pub expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Row struct for reading from the knife_types table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = knife_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct KnifeTypeRow {
    pub id: Uuid,
    pub name: String,
    pub market_price: i64,
    pub discount_price: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<KnifeTypeRow> for KnifeType {
    fn from(row: KnifeTypeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            market_price: row.market_price,
            discount_price: row.discount_price,
            image_url: row.image_url,
            is_active: row.is_active,
            display_order: row.display_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for creating catalogue entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = knife_types)]
pub(crate) struct NewKnifeTypeRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub market_price: i64,
    pub discount_price: i64,
    pub image_url: Option<&'a str>,
    pub is_active: bool,
    pub display_order: i32,
}

/// Changeset for partial catalogue updates; `None` fields keep their value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = knife_types)]
pub(crate) struct KnifeTypeChangeset<'a> {
    pub name: Option<&'a str>,
    pub market_price: Option<i64>,
    pub discount_price: Option<i64>,
    pub image_url: Option<&'a str>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

/// Row struct for reading from the bookings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub booking_time: String,
    pub total_quantity: i32,
    pub total_amount: i64,
    pub status: String,
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRow {
    pub(crate) fn into_domain(self) -> Result<Booking, String> {
        let status = BookingStatus::parse(&self.status)
            .ok_or_else(|| format!("invalid stored booking status: {}", self.status))?;
        Ok(Booking {
            id: self.id,
            user_id: UserId::from_uuid(self.user_id),
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            total_quantity: self.total_quantity,
            total_amount: self.total_amount,
            status,
            special_instructions: self.special_instructions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating booking rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub booking_time: &'a str,
    pub total_quantity: i32,
    pub total_amount: i64,
    pub status: &'a str,
    pub special_instructions: Option<&'a str>,
}

/// Row struct for reading from the booking_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = booking_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingItemRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub knife_type_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
}

impl From<BookingItemRow> for BookingItem {
    fn from(row: BookingItemRow) -> Self {
        Self {
            id: row.id,
            booking_id: row.booking_id,
            knife_type_id: row.knife_type_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
        }
    }
}

/// Insertable struct for creating booking item rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = booking_items)]
pub(crate) struct NewBookingItemRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub knife_type_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub related_booking_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationRow {
    pub(crate) fn into_domain(self) -> Result<Notification, String> {
        let kind = NotificationKind::parse(&self.kind)
            .ok_or_else(|| format!("invalid stored notification kind: {}", self.kind))?;
        Ok(Notification {
            id: self.id,
            user_id: UserId::from_uuid(self.user_id),
            title: self.title,
            message: self.message,
            kind,
            related_booking_id: self.related_booking_id,
            is_read: self.is_read,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating notification rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub message: &'a str,
    pub kind: &'a str,
    pub related_booking_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Row struct for reading from the user_addresses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AddressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_name: String,
    pub address: String,
    pub detail_address: Option<String>,
    pub is_default: bool,
    pub address_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AddressRow {
    pub(crate) fn into_domain(self) -> Result<Address, String> {
        let address_type = AddressKind::parse(&self.address_type)
            .ok_or_else(|| format!("invalid stored address type: {}", self.address_type))?;
        Ok(Address {
            id: self.id,
            user_id: UserId::from_uuid(self.user_id),
            address_name: self.address_name,
            address: self.address,
            detail_address: self.detail_address,
            is_default: self.is_default,
            address_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating address rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_addresses)]
pub(crate) struct NewAddressRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_name: &'a str,
    pub address: &'a str,
    pub detail_address: Option<&'a str>,
    pub is_default: bool,
    pub address_type: &'a str,
}

/// Changeset for partial address updates; `None` fields keep their value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = user_addresses)]
pub(crate) struct AddressChangeset<'a> {
    pub address_name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub detail_address: Option<&'a str>,
    pub is_default: Option<bool>,
    pub address_type: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Coupons
// ---------------------------------------------------------------------------

/// Row struct for reading from the user_coupons table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_coupons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserCouponRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub coupon_type_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserCouponRow> for UserCoupon {
    fn from(row: UserCouponRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            coupon_type_id: row.coupon_type_id,
            code: row.code,
            expires_at: row.expires_at,
            is_used: row.is_used,
            created_at: row.created_at,
        }
    }
}

/// Row struct for reading from the coupon_types table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = coupon_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CouponTypeRow {
    pub id: Uuid,
    pub name: String,
    pub discount_amount: i64,
    pub description: Option<String>,
    #[expect(dead_code, reason = "schema field not surfaced on the domain type")]
    pub created_at: DateTime<Utc>,
}

impl From<CouponTypeRow> for CouponType {
    fn from(row: CouponTypeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            discount_amount: row.discount_amount,
            description: row.description,
        }
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Row struct for reading from the banners table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = banners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BannerRow {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<BannerRow> for Banner {
    fn from(row: BannerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            image_url: row.image_url,
            link_url: row.link_url,
            is_active: row.is_active,
            display_order: row.display_order,
            created_at: row.created_at,
        }
    }
}

/// Row struct for reading from the payment_bank_accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payment_bank_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentAccountRow {
    pub id: Uuid,
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub is_active: bool,
    #[expect(dead_code, reason = "schema field not surfaced on the domain type")]
    pub created_at: DateTime<Utc>,
}

impl From<PaymentAccountRow> for PaymentAccount {
    fn from(row: PaymentAccountRow) -> Self {
        Self {
            id: row.id,
            bank_name: row.bank_name,
            account_number: row.account_number,
            account_holder: row.account_holder,
            is_active: row.is_active,
        }
    }
}
