use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use sahel_domain::page::Page;
use sahel_domain::payment::{Payment, PaymentFilter};
use sahel_domain::repository::{PaymentRepository, RepoResult};
use sahel_domain::DomainError;

const PAYMENT_COLUMNS: &str = "id, booking_id, amount, status, payment_method, \
     transaction_reference, created_at, updated_at";

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    booking_id: Uuid,
    amount: i64,
    status: String,
    payment_method: Option<String>,
    transaction_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            booking_id: row.booking_id,
            amount: row.amount,
            status: row.status.parse()?,
            payment_method: row.payment_method,
            transaction_reference: row.transaction_reference,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &PaymentFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND created_at <= ").push_bind(to);
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn list(
        &self,
        page: u32,
        limit: u32,
        filter: &PaymentFilter,
    ) -> RepoResult<Page<Payment>> {
        let limit_nz = limit.max(1) as i64;
        let offset = (page.max(1) as i64 - 1) * limit_nz;

        let mut query = QueryBuilder::new(format!("SELECT {PAYMENT_COLUMNS} FROM payments"));
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit_nz)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows: Vec<PaymentRow> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM payments");
        push_filters(&mut count_query, filter);
        let count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let payments = rows
            .into_iter()
            .map(Payment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(payments, count, page, limit))
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Payment>> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Payment::try_from).transpose()?)
    }

    async fn for_booking(&self, booking_id: Uuid) -> RepoResult<Vec<Payment>> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE booking_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(Payment::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn fetch_since(&self, start: DateTime<Utc>) -> RepoResult<Vec<Payment>> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE created_at >= $1 \
             ORDER BY created_at DESC"
        ))
        .bind(start)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(Payment::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
