//! Shared helpers for HTTP handler tests.
//!
//! Builds an in-process app around mock ports plus a deterministic token
//! codec so handler tests can mint valid session cookies without running the
//! real auth service.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ports::{
    MockAddressService, MockAuthService, MockBookingService, MockCatalogueRepository,
    MockContentRepository, MockCouponService, MockNotificationService,
};
use crate::domain::{
    AdminId, AdminRole, AdminUser, ClientUser, IssuedToken, PhoneNumber, SessionKind, TokenCodec,
    UserId,
};
use crate::inbound::http::routes;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

const TEST_SECRET: &[u8] = b"handler-test-secret-handler-test-secret-0000";

/// A client fixture identity.
pub(crate) fn client_user() -> ClientUser {
    ClientUser {
        id: UserId::random(),
        phone: PhoneNumber::new("01012345678").expect("valid phone"),
        name: "Jihye".into(),
        created_at: Utc::now(),
    }
}

/// An admin fixture identity.
pub(crate) fn admin_user() -> AdminUser {
    AdminUser {
        id: AdminId::random(),
        username: "manager".into(),
        name: "Manager".into(),
        role: AdminRole::Admin,
    }
}

/// Ports bundle where every port is an expectation-free mock.
///
/// Tests install expectations on the ports they exercise; any unexpected
/// call panics, which is exactly what handler tests want.
pub(crate) fn default_ports() -> HttpStatePorts {
    HttpStatePorts {
        auth: Arc::new(MockAuthService::new()),
        bookings: Arc::new(MockBookingService::new()),
        notifications: Arc::new(MockNotificationService::new()),
        addresses: Arc::new(MockAddressService::new()),
        coupons: Arc::new(MockCouponService::new()),
        catalogue: Arc::new(MockCatalogueRepository::new()),
        content: Arc::new(MockContentRepository::new()),
    }
}

/// In-process application plus the codec used to mint its cookies.
pub(crate) struct TestApp<S> {
    service: S,
}

impl TestApp<()> {
    fn codec() -> TokenCodec {
        TokenCodec::new(TEST_SECRET)
    }

    /// Issue a token valid for the app built by this module.
    pub(crate) fn issue(subject: &str, kind: SessionKind) -> IssuedToken {
        Self::issue_at(subject, kind, Utc::now())
    }

    /// Issue a token with an explicit issue time (e.g. already expired).
    pub(crate) fn issue_at(
        subject: &str,
        kind: SessionKind,
        now: DateTime<Utc>,
    ) -> IssuedToken {
        Self::codec()
            .issue(subject, kind, now)
            .expect("issue test token")
    }

    /// Build an app with a custom auth service and default mocks elsewhere.
    pub(crate) async fn with_auth(
        auth: MockAuthService,
    ) -> TestApp<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>>
    {
        let ports = HttpStatePorts {
            auth: Arc::new(auth),
            ..default_ports()
        };
        Self::with_ports(ports).await
    }

    /// Build an app from an explicit ports bundle.
    pub(crate) async fn with_ports(
        ports: HttpStatePorts,
    ) -> TestApp<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>>
    {
        let state = HttpState::new(ports, Arc::new(Self::codec()), false);
        let service = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(routes::configure),
        )
        .await;
        TestApp { service }
    }
}

impl<S> TestApp<S>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    /// Access the underlying service for hand-built requests.
    pub(crate) fn service(&self) -> &S {
        &self.service
    }

    /// POST a JSON body.
    pub(crate) async fn post_json<T: Serialize>(
        &self,
        uri: &str,
        body: &T,
    ) -> ServiceResponse<BoxBody> {
        let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
        test::call_service(&self.service, req).await
    }

    /// POST with no body.
    pub(crate) async fn post_empty(&self, uri: &str) -> ServiceResponse<BoxBody> {
        let req = test::TestRequest::post().uri(uri).to_request();
        test::call_service(&self.service, req).await
    }

    /// GET without credentials.
    pub(crate) async fn get(&self, uri: &str) -> ServiceResponse<BoxBody> {
        let req = test::TestRequest::get().uri(uri).to_request();
        test::call_service(&self.service, req).await
    }

    /// GET carrying a freshly minted client session cookie.
    pub(crate) async fn get_with_client_cookie(
        &self,
        uri: &str,
        user_id: &UserId,
    ) -> ServiceResponse<BoxBody> {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(client_cookie(user_id))
            .to_request();
        test::call_service(&self.service, req).await
    }

    /// POST a JSON body carrying a client session cookie.
    pub(crate) async fn post_json_with_client_cookie<T: Serialize>(
        &self,
        uri: &str,
        user_id: &UserId,
        body: &T,
    ) -> ServiceResponse<BoxBody> {
        let req = test::TestRequest::post()
            .uri(uri)
            .cookie(client_cookie(user_id))
            .set_json(body)
            .to_request();
        test::call_service(&self.service, req).await
    }

    /// POST with no body carrying a client session cookie.
    pub(crate) async fn post_empty_with_client_cookie(
        &self,
        uri: &str,
        user_id: &UserId,
    ) -> ServiceResponse<BoxBody> {
        let req = test::TestRequest::post()
            .uri(uri)
            .cookie(client_cookie(user_id))
            .to_request();
        test::call_service(&self.service, req).await
    }
}

/// A valid client session cookie for the test app.
pub(crate) fn client_cookie(user_id: &UserId) -> Cookie<'static> {
    let issued = TestApp::issue(&user_id.to_string(), SessionKind::Client);
    Cookie::new("auth-token", issued.token)
}

/// A valid admin session cookie for the test app.
pub(crate) fn admin_cookie(admin_id: &AdminId) -> Cookie<'static> {
    let issued = TestApp::issue(&admin_id.to_string(), SessionKind::Admin);
    Cookie::new("admin-token", issued.token)
}
