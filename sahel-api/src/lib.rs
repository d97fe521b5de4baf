use axum::{http::Method, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod commissions;
pub mod customers;
pub mod error;
pub mod notifications;
pub mod payments;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // The dashboard frontend is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(bookings::routes())
        .merge(customers::routes())
        .merge(payments::routes())
        .merge(commissions::routes())
        .merge(notifications::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
