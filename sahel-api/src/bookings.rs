use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sahel_core::classifier::{self, PackageSubtype};
use sahel_core::customers;
use sahel_domain::booking::{
    Booking, BookingFilter, BookingStatus, BookingType, BookingUpdate, NewBooking,
};
use sahel_domain::page::Page;
use sahel_domain::payment::Payment;

use crate::error::AppError;
use crate::state::AppState;

/// Booking row enriched with the derived display fields the dashboard
/// tables render next to the raw columns.
#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_subtype: Option<PackageSubtype>,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        let customer_name = customers::display_name(&booking);
        let package_subtype = (booking.booking_type == BookingType::Package)
            .then(|| classifier::classify(&booking));
        Self {
            booking,
            customer_name,
            package_subtype,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: BookingView,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<BookingStatus>,
    pub booking_type: Option<BookingType>,
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub amount_min: Option<i64>,
    pub amount_max: Option<i64>,
    pub customer_email: Option<String>,
    /// Display-level filter resolved through the classifier, not a column.
    pub package_subtype: Option<PackageSubtype>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: BookingStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(list_bookings).post(create_booking))
        .route(
            "/v1/bookings/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .route("/v1/bookings/{id}/status", put(update_status))
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Page<BookingView>>, AppError> {
    let filter = BookingFilter {
        status: query.status,
        booking_type: query.booking_type,
        search: query.search,
        date_from: query.date_from,
        date_to: query.date_to,
        amount_min: query.amount_min,
        amount_max: query.amount_max,
        customer_email: query.customer_email,
    };

    let page = state
        .bookings
        .list(query.page, query.limit, &filter)
        .await
        .map_err(AppError::internal)?;

    let mut views: Vec<BookingView> = page.data.into_iter().map(BookingView::from).collect();
    // Subtypes are inferred, so this filter runs over the fetched page, the
    // same way the dashboard applies it.
    if let Some(wanted) = query.package_subtype {
        views.retain(|view| view.package_subtype == Some(wanted));
    }

    Ok(Json(Page {
        data: views,
        count: page.count,
        page: page.page,
        total_pages: page.total_pages,
    }))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingDetail>, AppError> {
    let booking = state
        .bookings
        .get(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Booking {id} not found")))?;
    let payments = state
        .payments
        .for_booking(id)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(BookingDetail {
        booking: booking.into(),
        payments,
    }))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<NewBooking>,
) -> Result<Json<BookingView>, AppError> {
    if req.total_amount < 0 {
        return Err(AppError::Validation(
            "total_amount must not be negative on creation".to_string(),
        ));
    }
    let booking = state
        .bookings
        .create(req)
        .await
        .map_err(AppError::internal)?;
    tracing::info!("Booking created: {}", booking.id);
    Ok(Json(booking.into()))
}

async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<BookingUpdate>,
) -> Result<Json<BookingView>, AppError> {
    let booking = state
        .bookings
        .update(id, req)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Booking {id} not found")))?;
    Ok(Json(booking.into()))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<BookingView>, AppError> {
    let booking = state
        .bookings
        .update_status(id, req.status)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Booking {id} not found")))?;
    tracing::info!("Booking {} status set to {}", id, booking.status);
    Ok(Json(booking.into()))
}

/// Bookings are never hard-deleted; delete cancels them.
async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, AppError> {
    let booking = state
        .bookings
        .update_status(id, BookingStatus::Cancelled)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Booking {id} not found")))?;
    Ok(Json(booking.into()))
}
