use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

use sahel_core::payments::{self, PaymentStats};
use sahel_domain::page::Page;
use sahel_domain::payment::{Payment, PaymentFilter, PaymentStatus};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<PaymentStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub period: StatsPeriod,
}

impl StatsPeriod {
    fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            StatsPeriod::Day => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc())
                .unwrap_or(now),
            StatsPeriod::Week => now - Duration::days(7),
            StatsPeriod::Month => now - Duration::days(30),
            StatsPeriod::Year => now - Duration::days(365),
            StatsPeriod::All => Utc.timestamp_opt(0, 0).single().unwrap_or(now),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/payments", get(list_payments))
        .route("/v1/payments/stats", get(payment_stats))
        .route("/v1/payments/{id}", get(get_payment))
}

async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<Page<Payment>>, AppError> {
    let filter = PaymentFilter {
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let page = state
        .payments
        .list(query.page, query.limit, &filter)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(page))
}

async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>, AppError> {
    let payment = state
        .payments
        .get(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Payment {id} not found")))?;
    Ok(Json(payment))
}

async fn payment_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<PaymentStats>, AppError> {
    let start = query.period.start(Utc::now());
    let rows = state
        .payments
        .fetch_since(start)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(payments::stats(&rows)))
}
