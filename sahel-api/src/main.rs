use std::net::SocketAddr;
use std::sync::Arc;

use sahel_api::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sahel_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = sahel_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Sahel API on port {}", config.server.port);

    let db = sahel_store::DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let app_state = AppState {
        bookings: Arc::new(sahel_store::PgBookingRepository::new(db.pool.clone())),
        payments: Arc::new(sahel_store::PgPaymentRepository::new(db.pool.clone())),
        commissions: Arc::new(sahel_store::PgCommissionRepository::new(db.pool.clone())),
        notifications: Arc::new(sahel_store::PgNotificationRepository::new(db.pool.clone())),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
