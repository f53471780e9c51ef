//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//! When migrations change the schema, regenerate with `diesel print-schema`
//! or update by hand.

diesel::table! {
    /// Consumer accounts, identified by a verified phone number.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised digits-only phone number (unique).
        phone -> Varchar,
        /// Display name chosen at signup.
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Back-office accounts with password credentials.
    admins (id) {
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// bcrypt hash of the password.
        password_hash -> Varchar,
        name -> Varchar,
        /// Role string: super_admin, admin, or staff.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One-time phone verification codes; one row per OTP request.
    verification_codes (id) {
        id -> Uuid,
        phone -> Varchar,
        code -> Varchar,
        /// Flow the code was issued for: signup or login.
        purpose -> Varchar,
        expires_at -> Timestamptz,
        used -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Service catalogue entries; soft-deleted via is_active.
    knife_types (id) {
        id -> Uuid,
        name -> Varchar,
        /// Reference market price in KRW.
        market_price -> Int8,
        /// Effective sale price in KRW.
        discount_price -> Int8,
        image_url -> Nullable<Varchar>,
        is_active -> Bool,
        display_order -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookings; totals are computed by the workflow at creation time.
    bookings (id) {
        id -> Uuid,
        user_id -> Uuid,
        booking_date -> Date,
        /// Pickup time slot, e.g. "14:00".
        booking_time -> Varchar,
        total_quantity -> Int4,
        total_amount -> Int8,
        /// Status string from the booking status enum.
        status -> Varchar,
        special_instructions -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Booking line items with their price snapshots.
    booking_items (id) {
        id -> Uuid,
        booking_id -> Uuid,
        knife_type_id -> Uuid,
        quantity -> Int4,
        /// Catalogue discount price at booking time, in KRW.
        unit_price -> Int8,
        total_price -> Int8,
    }
}

diesel::table! {
    /// User notifications; mutated only by the owner marking read.
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        message -> Text,
        /// Category string: booking, coupon, or system.
        kind -> Varchar,
        related_booking_id -> Nullable<Uuid>,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Client delivery addresses; at most one default per user.
    user_addresses (id) {
        id -> Uuid,
        user_id -> Uuid,
        address_name -> Varchar,
        address -> Varchar,
        detail_address -> Nullable<Varchar>,
        is_default -> Bool,
        /// Category string: home, work, or other.
        address_type -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shared coupon templates.
    coupon_types (id) {
        id -> Uuid,
        name -> Varchar,
        discount_amount -> Int8,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Coupon instances issued to users; usage is one-way.
    user_coupons (id) {
        id -> Uuid,
        user_id -> Uuid,
        coupon_type_id -> Uuid,
        code -> Varchar,
        expires_at -> Timestamptz,
        is_used -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Landing-page banners.
    banners (id) {
        id -> Uuid,
        title -> Varchar,
        image_url -> Varchar,
        link_url -> Nullable<Varchar>,
        is_active -> Bool,
        display_order -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bank accounts displayed for wire-transfer payment.
    payment_bank_accounts (id) {
        id -> Uuid,
        bank_name -> Varchar,
        account_number -> Varchar,
        account_holder -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(booking_items -> bookings (booking_id));
diesel::joinable!(booking_items -> knife_types (knife_type_id));
diesel::joinable!(bookings -> users (user_id));
diesel::joinable!(notifications -> users (user_id));
diesel::joinable!(user_addresses -> users (user_id));
diesel::joinable!(user_coupons -> coupon_types (coupon_type_id));
diesel::joinable!(user_coupons -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    admins,
    verification_codes,
    knife_types,
    bookings,
    booking_items,
    notifications,
    user_addresses,
    coupon_types,
    user_coupons,
    banners,
    payment_bank_accounts,
);
