use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use sahel_domain::commission::{
    CommissionEntry, CommissionHistoryFilter, CommissionSetting, CommissionSettingUpdate,
    NewCommissionSetting,
};
use sahel_domain::repository::{CommissionRepository, RepoResult};
use sahel_domain::DomainError;

const SETTING_COLUMNS: &str = "id, service_type, commission_type, value, is_active, valid_from, \
     created_at, updated_at";
const ENTRY_COLUMNS: &str = "id, booking_id, service_type, commission_amount, base_amount, \
     applied_percentage, created_at";

pub struct PgCommissionRepository {
    pool: PgPool,
}

impl PgCommissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SettingRow {
    id: Uuid,
    service_type: String,
    commission_type: String,
    value: f64,
    is_active: bool,
    valid_from: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SettingRow> for CommissionSetting {
    type Error = DomainError;

    fn try_from(row: SettingRow) -> Result<Self, Self::Error> {
        Ok(CommissionSetting {
            id: row.id,
            service_type: row.service_type.parse()?,
            commission_type: row.commission_type.parse()?,
            value: row.value,
            is_active: row.is_active,
            valid_from: row.valid_from,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    booking_id: Uuid,
    service_type: String,
    commission_amount: i64,
    base_amount: i64,
    applied_percentage: Option<f64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<EntryRow> for CommissionEntry {
    type Error = DomainError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        Ok(CommissionEntry {
            id: row.id,
            booking_id: row.booking_id,
            service_type: row.service_type.parse()?,
            commission_amount: row.commission_amount,
            base_amount: row.base_amount,
            applied_percentage: row.applied_percentage,
            created_at: row.created_at,
        })
    }
}

fn settings_from(rows: Vec<SettingRow>) -> Result<Vec<CommissionSetting>, DomainError> {
    rows.into_iter().map(CommissionSetting::try_from).collect()
}

fn entries_from(rows: Vec<EntryRow>) -> Result<Vec<CommissionEntry>, DomainError> {
    rows.into_iter().map(CommissionEntry::try_from).collect()
}

#[async_trait]
impl CommissionRepository for PgCommissionRepository {
    async fn settings(&self) -> RepoResult<Vec<CommissionSetting>> {
        let rows: Vec<SettingRow> = sqlx::query_as(&format!(
            "SELECT {SETTING_COLUMNS} FROM commission_settings \
             ORDER BY service_type ASC, valid_from DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(settings_from(rows)?)
    }

    async fn active_settings(&self) -> RepoResult<Vec<CommissionSetting>> {
        let rows: Vec<SettingRow> = sqlx::query_as(&format!(
            "SELECT {SETTING_COLUMNS} FROM commission_settings \
             WHERE is_active = TRUE ORDER BY service_type ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(settings_from(rows)?)
    }

    async fn create_setting(&self, setting: NewCommissionSetting) -> RepoResult<CommissionSetting> {
        let now = Utc::now();
        let row: SettingRow = sqlx::query_as(&format!(
            "INSERT INTO commission_settings \
                 (id, service_type, commission_type, value, is_active, valid_from, \
                  created_at, updated_at) \
             VALUES ($1, $2, $3, $4, TRUE, $5, $6, $6) \
             RETURNING {SETTING_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(setting.service_type.as_str())
        .bind(setting.commission_type.as_str())
        .bind(setting.value)
        .bind(setting.valid_from.unwrap_or(now))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_into()?)
    }

    async fn update_setting(
        &self,
        id: Uuid,
        update: CommissionSettingUpdate,
    ) -> RepoResult<Option<CommissionSetting>> {
        let row: Option<SettingRow> = sqlx::query_as(&format!(
            "UPDATE commission_settings SET \
                 commission_type = COALESCE($2, commission_type), \
                 value = COALESCE($3, value), \
                 is_active = COALESCE($4, is_active), \
                 updated_at = $5 \
             WHERE id = $1 \
             RETURNING {SETTING_COLUMNS}"
        ))
        .bind(id)
        .bind(update.commission_type.map(|ct| ct.as_str()))
        .bind(update.value)
        .bind(update.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(CommissionSetting::try_from).transpose()?)
    }

    async fn deactivate_setting(&self, id: Uuid) -> RepoResult<Option<CommissionSetting>> {
        self.update_setting(
            id,
            CommissionSettingUpdate {
                is_active: Some(false),
                ..CommissionSettingUpdate::default()
            },
        )
        .await
    }

    async fn history(&self, filter: &CommissionHistoryFilter) -> RepoResult<Vec<CommissionEntry>> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} FROM commission_history"));
        query.push(" WHERE 1 = 1");
        if let Some(from) = filter.date_from {
            query.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            query.push(" AND created_at <= ").push_bind(to);
        }
        if let Some(service_type) = filter.service_type {
            query
                .push(" AND service_type = ")
                .push_bind(service_type.as_str());
        }
        query.push(" ORDER BY created_at DESC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }
        let rows: Vec<EntryRow> = query.build_query_as().fetch_all(&self.pool).await?;
        Ok(entries_from(rows)?)
    }

    async fn entries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<CommissionEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(&format!(
            "SELECT {ENTRY_COLUMNS} FROM commission_history \
             WHERE created_at >= $1 AND created_at <= $2 \
             ORDER BY created_at DESC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries_from(rows)?)
    }
}
