use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farelink_api::{app, AppState};
use farelink_benzy::clock::SystemClock;
use farelink_benzy::search::PollConfig;
use farelink_benzy::{
    AncillaryService, CredentialCache, HttpSupplierGateway, PricingReconciler, SearchOrchestrator,
};
use farelink_order::BookingService;
use farelink_store::booking_repo::PgBookingRepository;
use farelink_store::flight_repo::PgFlightRepository;
use farelink_store::payment_repo::PgPaymentRepository;
use farelink_store::{DbClient, RedisStore, ResultCache};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farelink=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = farelink_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Farelink API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let redis = RedisStore::new(&config.redis.url).expect("Failed to open Redis client");
    let cache = ResultCache::new(Arc::new(redis));

    let http = reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client");

    let gateway = Arc::new(HttpSupplierGateway::new(http, config.supplier.clone()));
    let clock = Arc::new(SystemClock);
    let credentials = CredentialCache::new(gateway.clone(), config.supplier.clone(), clock.clone());

    let search = Arc::new(SearchOrchestrator::new(
        gateway.clone(),
        credentials.clone(),
        cache.clone(),
        clock,
        PollConfig::default(),
    ));
    let pricing = Arc::new(PricingReconciler::new(
        gateway.clone(),
        credentials.clone(),
        cache.clone(),
    ));
    let ancillary = Arc::new(AncillaryService::new(
        gateway.clone(),
        credentials.clone(),
        cache,
    ));
    let bookings = Arc::new(BookingService::new(
        gateway,
        credentials,
        Arc::new(PgBookingRepository::new(db.pool.clone())),
        Arc::new(PgPaymentRepository::new(db.pool.clone())),
        Arc::new(PgFlightRepository::new(db.pool.clone())),
        config.supplier.browser_key.clone(),
    ));

    let state = AppState {
        search,
        pricing,
        ancillary,
        bookings,
        frontend_base_url: config.frontend.base_url.clone(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app(state))
        .await
        .expect("Server error");
}
