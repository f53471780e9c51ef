//! Server construction and wiring.
//!
//! Builds the port implementations from validated settings, assembles the
//! HTTP state, and runs the actix server. Handlers never see infrastructure
//! types; everything crosses the boundary as `Arc<dyn Port>`.

mod config;

pub use config::{AppSettings, BuildMode, ConfigError, SettingsEnv, SmsSettings, load};

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::Trace;
use backend::domain::ports::SmsSender;
use backend::domain::{
    AddressServiceImpl, AuthServiceImpl, BookingServiceImpl, CouponServiceImpl,
    NotificationServiceImpl, TokenCodec,
};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::routes;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::inbound::ws;
use backend::inbound::ws::state::{NotificationHub, WsState};
use backend::outbound::persistence::{
    DbPool, DieselAddressRepository, DieselAdminRepository, DieselBookingRepository,
    DieselCatalogueRepository, DieselClientRepository, DieselContentRepository,
    DieselCouponRepository, DieselNotificationRepository, DieselVerificationCodeRepository,
    PoolConfig, run_migrations,
};
use backend::outbound::sms::{AligoSmsSender, ConsoleSmsSender, TwilioSmsSender};

fn build_sms_sender(settings: &SmsSettings) -> std::io::Result<Arc<dyn SmsSender>> {
    match settings {
        SmsSettings::Console => Ok(Arc::new(ConsoleSmsSender)),
        SmsSettings::Twilio(twilio) => TwilioSmsSender::new(twilio.clone())
            .map(|sender| Arc::new(sender) as Arc<dyn SmsSender>)
            .map_err(|err| std::io::Error::other(err.to_string())),
        SmsSettings::Aligo(aligo) => AligoSmsSender::new(aligo.clone())
            .map(|sender| Arc::new(sender) as Arc<dyn SmsSender>)
            .map_err(|err| std::io::Error::other(err.to_string())),
    }
}

fn build_ports(pool: &DbPool, sms: Arc<dyn SmsSender>, codec: &Arc<TokenCodec>) -> (HttpStatePorts, Arc<NotificationHub>) {
    let clock = Arc::new(DefaultClock);
    let hub = Arc::new(NotificationHub::new());

    let notifications = Arc::new(NotificationServiceImpl::new(
        Arc::new(DieselNotificationRepository::new(pool.clone())),
        hub.clone(),
    ));
    let auth = Arc::new(AuthServiceImpl::new(
        Arc::new(DieselClientRepository::new(pool.clone())),
        Arc::new(DieselAdminRepository::new(pool.clone())),
        Arc::new(DieselVerificationCodeRepository::new(pool.clone())),
        sms,
        codec.clone(),
        clock.clone(),
    ));
    let bookings = Arc::new(BookingServiceImpl::new(
        Arc::new(DieselBookingRepository::new(pool.clone())),
        Arc::new(DieselCatalogueRepository::new(pool.clone())),
        notifications.clone(),
    ));
    let addresses = Arc::new(AddressServiceImpl::new(Arc::new(
        DieselAddressRepository::new(pool.clone()),
    )));
    let coupons = Arc::new(CouponServiceImpl::new(
        Arc::new(DieselCouponRepository::new(pool.clone())),
        clock,
    ));

    let ports = HttpStatePorts {
        auth,
        bookings,
        notifications,
        addresses,
        coupons,
        catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
        content: Arc::new(DieselContentRepository::new(pool.clone())),
    };
    (ports, hub)
}

/// Run the server until shutdown.
pub async fn run(settings: AppSettings) -> std::io::Result<()> {
    if settings.run_migrations {
        run_migrations(&settings.database_url)
            .await
            .map_err(|err| std::io::Error::other(err.to_string()))?;
    }

    let pool = DbPool::new(PoolConfig::new(&settings.database_url))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let codec = Arc::new(TokenCodec::new(&settings.token_secret));
    let sms = build_sms_sender(&settings.sms)?;
    let (ports, hub) = build_ports(&pool, sms, &codec);

    let http_state = web::Data::new(HttpState::new(
        ports,
        codec.clone(),
        settings.cookie_secure,
    ));
    let ws_state = web::Data::new(WsState::new(hub, codec));
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(http_state.clone())
            .app_data(ws_state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .configure(routes::configure)
            .service(ws::notifications_feed)
            .service(ready)
            .service(live);
        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
        app
    })
    .bind(settings.bind_addr)?;

    info!(addr = %settings.bind_addr, "server listening");
    health_state.mark_ready();
    server.run().await
}
