use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use sahel_domain::notification::{NewNotification, Notification, NotificationFilter};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct UnreadCount {
    unread: i64,
}

#[derive(Debug, Serialize)]
struct MarkedAll {
    marked: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/v1/notifications/unread-count", get(unread_count))
        .route("/v1/notifications/read-all", put(mark_all_read))
        .route("/v1/notifications/{id}", get(get_notification))
        .route("/v1/notifications/{id}/read", put(mark_read))
        .route("/v1/notifications/{id}/archive", put(archive))
}

async fn list_notifications(
    State(state): State<AppState>,
    Query(filter): Query<NotificationFilter>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state
        .notifications
        .list(&filter)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(notifications))
}

async fn create_notification(
    State(state): State<AppState>,
    Json(input): Json<NewNotification>,
) -> Result<Json<Notification>, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }
    let notification = state
        .notifications
        .create(input)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(notification))
}

async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    let notification = state
        .notifications
        .get(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))?;
    Ok(Json(notification))
}

async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    let notification = state
        .notifications
        .mark_read(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))?;
    Ok(Json(notification))
}

async fn mark_all_read(State(state): State<AppState>) -> Result<Json<MarkedAll>, AppError> {
    let marked = state
        .notifications
        .mark_all_read()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(MarkedAll { marked }))
}

async fn archive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    let notification = state
        .notifications
        .archive(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))?;
    Ok(Json(notification))
}

async fn unread_count(State(state): State<AppState>) -> Result<Json<UnreadCount>, AppError> {
    let unread = state
        .notifications
        .unread_count()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(UnreadCount { unread }))
}
