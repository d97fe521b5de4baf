use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use sahel_domain::booking::{
    Booking, BookingFilter, BookingStatus, BookingUpdate, NewBooking,
};
use sahel_domain::page::Page;
use sahel_domain::repository::{BookingRepository, RepoResult};
use sahel_domain::DomainError;

const BOOKING_COLUMNS: &str = "id, booking_type, status, guest_email, guest_phone, total_amount, \
     commission_amount, commission_percentage, passenger_details, flight_details, metadata, \
     created_at, updated_at";

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    booking_type: String,
    status: String,
    guest_email: Option<String>,
    guest_phone: Option<String>,
    total_amount: i64,
    commission_amount: Option<i64>,
    commission_percentage: Option<f64>,
    passenger_details: Option<Value>,
    flight_details: Option<Value>,
    metadata: Option<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            booking_type: row.booking_type.parse()?,
            status: row.status.parse()?,
            guest_email: row.guest_email,
            guest_phone: row.guest_phone,
            total_amount: row.total_amount,
            commission_amount: row.commission_amount,
            commission_percentage: row.commission_percentage,
            passenger_details: row.passenger_details,
            flight_details: row.flight_details,
            metadata: row.metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn end_of_day(date: DateTime<Utc>) -> DateTime<Utc> {
    date.date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .map(|naive| naive.and_utc())
        .unwrap_or(date)
}

/// Append the filter clauses shared by the paged list, the exact count and
/// the unpaginated fetch, so all three always agree.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookingFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(booking_type) = filter.booking_type {
        builder
            .push(" AND booking_type = ")
            .push_bind(booking_type.as_str());
    }
    if let Some(search) = filter.search.as_deref() {
        let pattern = format!("%{search}%");
        builder
            .push(" AND (guest_email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR guest_phone ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        // Inclusive of the whole end day.
        builder.push(" AND created_at <= ").push_bind(end_of_day(to));
    }
    if let Some(min) = filter.amount_min {
        builder.push(" AND total_amount >= ").push_bind(min);
    }
    if let Some(max) = filter.amount_max {
        builder.push(" AND total_amount <= ").push_bind(max);
    }
    if let Some(email) = filter.customer_email.as_deref() {
        builder
            .push(" AND guest_email ILIKE ")
            .push_bind(format!("%{email}%"));
    }
}

fn rows_to_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, DomainError> {
    rows.into_iter().map(Booking::try_from).collect()
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn list(
        &self,
        page: u32,
        limit: u32,
        filter: &BookingFilter,
    ) -> RepoResult<Page<Booking>> {
        let limit_nz = limit.max(1) as i64;
        let offset = (page.max(1) as i64 - 1) * limit_nz;

        let mut query = QueryBuilder::new(format!("SELECT {BOOKING_COLUMNS} FROM bookings"));
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit_nz)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows: Vec<BookingRow> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM bookings");
        push_filters(&mut count_query, filter);
        let count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(rows_to_bookings(rows)?, count, page, limit))
    }

    async fn fetch_matching(&self, filter: &BookingFilter) -> RepoResult<Vec<Booking>> {
        let mut query = QueryBuilder::new(format!("SELECT {BOOKING_COLUMNS} FROM bookings"));
        push_filters(&mut query, filter);
        query.push(" ORDER BY created_at DESC");
        let rows: Vec<BookingRow> = query.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows_to_bookings(rows)?)
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Booking::try_from).transpose()?)
    }

    async fn create(&self, booking: NewBooking) -> RepoResult<Booking> {
        let now = Utc::now();
        let row: BookingRow = sqlx::query_as(&format!(
            "INSERT INTO bookings \
                 (id, booking_type, status, guest_email, guest_phone, total_amount, \
                  passenger_details, flight_details, metadata, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(booking.booking_type.as_str())
        .bind(BookingStatus::Pending.as_str())
        .bind(booking.guest_email)
        .bind(booking.guest_phone)
        .bind(booking.total_amount)
        .bind(booking.passenger_details)
        .bind(booking.flight_details)
        .bind(booking.metadata)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_into()?)
    }

    async fn update(&self, id: Uuid, update: BookingUpdate) -> RepoResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "UPDATE bookings SET \
                 status = COALESCE($2, status), \
                 guest_email = COALESCE($3, guest_email), \
                 guest_phone = COALESCE($4, guest_phone), \
                 total_amount = COALESCE($5, total_amount), \
                 passenger_details = COALESCE($6, passenger_details), \
                 flight_details = COALESCE($7, flight_details), \
                 updated_at = $8 \
             WHERE id = $1 \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .bind(update.status.map(|status| status.as_str()))
        .bind(update.guest_email)
        .bind(update.guest_phone)
        .bind(update.total_amount)
        .bind(update.passenger_details)
        .bind(update.flight_details)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Booking::try_from).transpose()?)
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> RepoResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "UPDATE bookings SET status = $2, updated_at = $3 WHERE id = $1 \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Booking::try_from).transpose()?)
    }

    async fn for_customer(&self, email: &str) -> RepoResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE guest_email = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows_to_bookings(rows)?)
    }

    async fn latest_for_customer(&self, email: &str) -> RepoResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE guest_email = $1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Booking::try_from).transpose()?)
    }

    async fn set_metadata(&self, id: Uuid, metadata: Value) -> RepoResult<()> {
        sqlx::query("UPDATE bookings SET metadata = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(metadata)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
