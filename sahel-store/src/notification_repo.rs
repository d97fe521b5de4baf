use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use sahel_domain::notification::{NewNotification, Notification, NotificationFilter};
use sahel_domain::repository::{NotificationRepository, RepoResult};
use sahel_domain::DomainError;

const NOTIFICATION_COLUMNS: &str = "id, kind, category, title, message, priority, is_read, \
     is_archived, action_url, related_entity_id, related_entity_type, metadata, created_at, \
     read_at, archived_at, expires_at";

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    kind: String,
    category: String,
    title: String,
    message: String,
    priority: String,
    is_read: bool,
    is_archived: bool,
    action_url: Option<String>,
    related_entity_id: Option<Uuid>,
    related_entity_type: Option<String>,
    metadata: Option<Value>,
    created_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
    archived_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            kind: row.kind.parse()?,
            category: row.category.parse()?,
            title: row.title,
            message: row.message,
            priority: row.priority.parse()?,
            is_read: row.is_read,
            is_archived: row.is_archived,
            action_url: row.action_url,
            related_entity_id: row.related_entity_id,
            related_entity_type: row.related_entity_type,
            metadata: row.metadata,
            created_at: row.created_at,
            read_at: row.read_at,
            archived_at: row.archived_at,
            expires_at: row.expires_at,
        })
    }
}

fn notifications_from(rows: Vec<NotificationRow>) -> Result<Vec<Notification>, DomainError> {
    rows.into_iter().map(Notification::try_from).collect()
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn list(&self, filter: &NotificationFilter) -> RepoResult<Vec<Notification>> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications"));
        // Expired notifications are never listed; archived ones only on demand.
        query.push(" WHERE (expires_at IS NULL OR expires_at > NOW())");
        if !filter.include_archived.unwrap_or(false) {
            query.push(" AND is_archived = FALSE");
        }
        if let Some(kind) = filter.kind {
            query.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(category) = filter.category {
            query.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(priority) = filter.priority {
            query.push(" AND priority = ").push_bind(priority.as_str());
        }
        if let Some(is_read) = filter.is_read {
            query.push(" AND is_read = ").push_bind(is_read);
        }
        if let Some(from) = filter.date_from {
            query.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            query.push(" AND created_at <= ").push_bind(to);
        }
        query.push(" ORDER BY created_at DESC");
        let rows: Vec<NotificationRow> = query.build_query_as().fetch_all(&self.pool).await?;
        Ok(notifications_from(rows)?)
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Notification>> {
        let row: Option<NotificationRow> = sqlx::query_as(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Notification::try_from).transpose()?)
    }

    async fn create(&self, notification: NewNotification) -> RepoResult<Notification> {
        let row: NotificationRow = sqlx::query_as(&format!(
            "INSERT INTO notifications \
                 (id, kind, category, title, message, priority, is_read, is_archived, \
                  action_url, related_entity_id, related_entity_type, metadata, created_at, \
                  expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, FALSE, FALSE, $7, $8, $9, $10, $11, $12) \
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(notification.kind.as_str())
        .bind(notification.category.as_str())
        .bind(notification.title)
        .bind(notification.message)
        .bind(notification.priority.as_str())
        .bind(notification.action_url)
        .bind(notification.related_entity_id)
        .bind(notification.related_entity_type)
        .bind(notification.metadata)
        .bind(Utc::now())
        .bind(notification.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_into()?)
    }

    async fn mark_read(&self, id: Uuid) -> RepoResult<Option<Notification>> {
        let row: Option<NotificationRow> = sqlx::query_as(&format!(
            "UPDATE notifications SET is_read = TRUE, read_at = $2 WHERE id = $1 \
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Notification::try_from).transpose()?)
    }

    async fn mark_all_read(&self) -> RepoResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = $1 \
             WHERE is_read = FALSE AND is_archived = FALSE",
        )
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn archive(&self, id: Uuid) -> RepoResult<Option<Notification>> {
        let row: Option<NotificationRow> = sqlx::query_as(&format!(
            "UPDATE notifications SET is_archived = TRUE, archived_at = $2 WHERE id = $1 \
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Notification::try_from).transpose()?)
    }

    async fn unread_count(&self) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE is_read = FALSE AND is_archived = FALSE \
               AND (expires_at IS NULL OR expires_at > NOW())",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
