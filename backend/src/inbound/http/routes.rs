//! Route table for the REST adapter.
//!
//! Keeps the scope layout in one place so the server and handler tests mount
//! exactly the same tree.

use actix_web::web;

use super::{addresses, admin, auth, bookings, catalogue, content, coupons, notifications};

/// Register every `/api` route on the given service config.
///
/// The caller supplies `web::Data<HttpState>` (and the WebSocket state where
/// applicable); this function only shapes the tree.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .service(auth::request_code)
                    .service(auth::client_login)
                    .service(auth::client_signup)
                    .service(auth::admin_login)
                    .service(auth::me)
                    .service(auth::logout),
            )
            .service(
                web::scope("/admin")
                    .service(admin::list_orders)
                    .service(admin::update_order_status)
                    .service(admin::list_products)
                    .service(admin::create_product)
                    .service(admin::update_product)
                    .service(admin::delete_product),
            )
            .service(catalogue::list_knife_types)
            .service(content::list_banners)
            .service(content::list_payment_accounts)
            .service(bookings::create_booking)
            .service(bookings::list_bookings)
            .service(bookings::cancel_booking)
            .service(notifications::list_notifications)
            .service(notifications::unread_count)
            .service(notifications::mark_read)
            .service(notifications::mark_all_read)
            .service(addresses::list_addresses)
            .service(addresses::create_address)
            .service(addresses::update_address)
            .service(addresses::delete_address)
            .service(addresses::set_default_address)
            .service(coupons::list_coupons)
            .service(coupons::redeem_coupon),
    );
}
