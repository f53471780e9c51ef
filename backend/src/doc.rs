//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! REST API: the documented paths from the inbound layer, the domain schemas
//! they reference, and the two session-cookie security schemes. Swagger UI is
//! mounted in debug builds only.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AdminRole, AdminUser, AuthenticatedUser, Booking, BookingItem, BookingLine, BookingStatus,
    BookingWithItems, ClientUser, CreateBookingRequest, Error, ErrorCode, KnifeType,
    KnifeTypeUpdate, NewKnifeType, PhoneNumber, SessionKind,
};

/// Enrich the generated document with the session cookie security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ClientSessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "auth-token",
                "Client session token issued by the client login/signup endpoints.",
            ))),
        );
        components.add_security_scheme(
            "AdminSessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "admin-token",
                "Admin session token issued by POST /api/auth/admin/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Whetstone booking API",
        description = "HTTP interface for the knife-sharpening booking service."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("ClientSessionCookie" = [])),
    paths(
        crate::inbound::http::auth::request_code,
        crate::inbound::http::auth::client_login,
        crate::inbound::http::auth::client_signup,
        crate::inbound::http::auth::admin_login,
        crate::inbound::http::auth::me,
        crate::inbound::http::auth::logout,
        crate::inbound::http::catalogue::list_knife_types,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::admin::list_orders,
        crate::inbound::http::admin::update_order_status,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PhoneNumber,
        SessionKind,
        AuthenticatedUser,
        ClientUser,
        AdminUser,
        AdminRole,
        KnifeType,
        NewKnifeType,
        KnifeTypeUpdate,
        Booking,
        BookingItem,
        BookingWithItems,
        BookingStatus,
        BookingLine,
        CreateBookingRequest,
    )),
    tags(
        (name = "auth", description = "Phone-verified client and password-based admin authentication"),
        (name = "catalogue", description = "Public catalogue browsing"),
        (name = "bookings", description = "Client booking workflow"),
        (name = "admin", description = "Back-office order and product management")
    )
)]
pub struct ApiDoc;
