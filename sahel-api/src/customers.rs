use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use sahel_core::customers;
use sahel_domain::booking::{Booking, BookingFilter};
use sahel_domain::customer::{Customer, CustomerStats};
use sahel_domain::page::Page;

use crate::bookings::BookingView;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub bookings: Vec<BookingView>,
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub tag: String,
}

#[derive(Debug, Deserialize)]
pub struct CommunicationRequest {
    pub channel: String,
    pub note: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/customers", get(list_customers))
        .route("/v1/customers/stats", get(customer_stats))
        .route("/v1/customers/{email}", get(get_customer))
        .route("/v1/customers/{email}/notes", put(update_notes))
        .route("/v1/customers/{email}/tags", axum::routing::post(add_tag))
        .route("/v1/customers/{email}/tags/{tag}", delete(remove_tag))
        .route(
            "/v1/customers/{email}/communications",
            axum::routing::post(record_communication),
        )
}

/// Customers are derived, not stored: every request re-folds the full
/// matching booking set. The search filter runs in the store so the fold
/// sees exactly the rows a matching customer contributed.
async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> Result<Json<Page<Customer>>, AppError> {
    let filter = BookingFilter {
        search: query.search,
        ..BookingFilter::default()
    };
    let bookings = state
        .bookings
        .fetch_matching(&filter)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(customers::aggregate(
        &bookings,
        query.page,
        query.limit,
        None,
    )))
}

async fn customer_stats(
    State(state): State<AppState>,
) -> Result<Json<CustomerStats>, AppError> {
    let bookings = state
        .bookings
        .fetch_matching(&BookingFilter::default())
        .await
        .map_err(AppError::internal)?;
    Ok(Json(customers::stats(&bookings, Utc::now())))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<CustomerDetail>, AppError> {
    let bookings = state
        .bookings
        .for_customer(&email)
        .await
        .map_err(AppError::internal)?;
    let customer = customers::profile(&bookings)
        .ok_or_else(|| AppError::NotFound(format!("Customer {email} not found")))?;

    Ok(Json(CustomerDetail {
        customer,
        bookings: bookings.into_iter().map(BookingView::from).collect(),
    }))
}

/// The metadata blob lives on the customer's most recent booking row; all
/// three mutations below are read-merge-write against that row.
async fn carrier_booking(state: &AppState, email: &str) -> Result<Booking, AppError> {
    state
        .bookings
        .latest_for_customer(email)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFound(format!("Customer {email} not found")))
}

fn merged_metadata(booking: &Booking, key: &str, value: Value) -> Value {
    let mut metadata = booking.metadata.clone().unwrap_or_else(|| json!({}));
    if !metadata.is_object() {
        metadata = json!({});
    }
    metadata[key] = value;
    metadata
}

async fn update_notes(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<NotesRequest>,
) -> Result<Json<BookingView>, AppError> {
    let mut booking = carrier_booking(&state, &email).await?;
    let metadata = merged_metadata(&booking, "customer_notes", Value::String(req.notes));
    state
        .bookings
        .set_metadata(booking.id, metadata.clone())
        .await
        .map_err(AppError::internal)?;
    booking.metadata = Some(metadata);
    Ok(Json(booking.into()))
}

async fn add_tag(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<TagRequest>,
) -> Result<Json<BookingView>, AppError> {
    let mut booking = carrier_booking(&state, &email).await?;
    let mut tags = booking.customer_tags();
    if !tags.contains(&req.tag) {
        tags.push(req.tag);
    }
    let metadata = merged_metadata(&booking, "customer_tags", json!(tags));
    state
        .bookings
        .set_metadata(booking.id, metadata.clone())
        .await
        .map_err(AppError::internal)?;
    booking.metadata = Some(metadata);
    Ok(Json(booking.into()))
}

async fn record_communication(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<CommunicationRequest>,
) -> Result<Json<BookingView>, AppError> {
    let mut booking = carrier_booking(&state, &email).await?;
    let mut history: Vec<Value> = booking
        .metadata
        .as_ref()
        .and_then(|meta| meta.get("communication_history"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    history.push(json!({
        "channel": req.channel,
        "note": req.note,
        "date": Utc::now(),
    }));
    let metadata = merged_metadata(&booking, "communication_history", json!(history));
    state
        .bookings
        .set_metadata(booking.id, metadata.clone())
        .await
        .map_err(AppError::internal)?;
    booking.metadata = Some(metadata);
    Ok(Json(booking.into()))
}

async fn remove_tag(
    State(state): State<AppState>,
    Path((email, tag)): Path<(String, String)>,
) -> Result<Json<BookingView>, AppError> {
    let mut booking = carrier_booking(&state, &email).await?;
    let tags: Vec<String> = booking
        .customer_tags()
        .into_iter()
        .filter(|existing| existing != &tag)
        .collect();
    let metadata = merged_metadata(&booking, "customer_tags", json!(tags));
    state
        .bookings
        .set_metadata(booking.id, metadata.clone())
        .await
        .map_err(AppError::internal)?;
    booking.metadata = Some(metadata);
    Ok(Json(booking.into()))
}
