use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use chrono::{Datelike, TimeZone, Utc};
use uuid::Uuid;

use sahel_core::commissions::{self, CommissionStats, MonthBucket};
use sahel_domain::commission::{
    CommissionEntry, CommissionHistoryFilter, CommissionSetting, CommissionSettingUpdate,
    NewCommissionSetting,
};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/commissions/settings",
            get(list_settings).post(create_setting),
        )
        .route(
            "/v1/commissions/settings/{id}",
            put(update_setting).delete(deactivate_setting),
        )
        .route("/v1/commissions/history", get(history))
        .route("/v1/commissions/stats", get(commission_stats))
        .route("/v1/commissions/monthly/{year}", get(monthly_revenue))
}

async fn list_settings(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommissionSetting>>, AppError> {
    let settings = state
        .commissions
        .settings()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(settings))
}

async fn create_setting(
    State(state): State<AppState>,
    Json(input): Json<NewCommissionSetting>,
) -> Result<Json<CommissionSetting>, AppError> {
    if input.value < 0.0 {
        return Err(AppError::Validation(
            "commission value must not be negative".into(),
        ));
    }
    let setting = state
        .commissions
        .create_setting(input)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(setting))
}

async fn update_setting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<CommissionSettingUpdate>,
) -> Result<Json<CommissionSetting>, AppError> {
    if let Some(value) = update.value {
        if value < 0.0 {
            return Err(AppError::Validation(
                "commission value must not be negative".into(),
            ));
        }
    }
    let setting = state
        .commissions
        .update_setting(id, update)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Commission setting {id} not found")))?;
    Ok(Json(setting))
}

async fn deactivate_setting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommissionSetting>, AppError> {
    let setting = state
        .commissions
        .deactivate_setting(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Commission setting {id} not found")))?;
    Ok(Json(setting))
}

async fn history(
    State(state): State<AppState>,
    Query(filter): Query<CommissionHistoryFilter>,
) -> Result<Json<Vec<CommissionEntry>>, AppError> {
    let entries = state
        .commissions
        .history(&filter)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(entries))
}

async fn commission_stats(
    State(state): State<AppState>,
) -> Result<Json<CommissionStats>, AppError> {
    let now = Utc::now();
    let month_start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    let entries = state
        .commissions
        .entries_between(month_start, now)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(commissions::stats(&entries)))
}

async fn monthly_revenue(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<MonthBucket>>, AppError> {
    let start = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::Validation(format!("invalid year {year}")))?;
    let end = Utc
        .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::Validation(format!("invalid year {year}")))?;
    let entries = state
        .commissions
        .entries_between(start, end)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(commissions::monthly_revenue(&entries, year)))
}
