use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
    Success,
    ActionRequired,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
            NotificationKind::Success => "success",
            NotificationKind::ActionRequired => "action_required",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(NotificationKind::Info),
            "warning" => Ok(NotificationKind::Warning),
            "error" => Ok(NotificationKind::Error),
            "success" => Ok(NotificationKind::Success),
            "action_required" => Ok(NotificationKind::ActionRequired),
            other => Err(crate::DomainError::UnknownNotificationField(
                other.to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Booking,
    Payment,
    Customer,
    System,
    Commission,
    Alert,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Booking => "booking",
            NotificationCategory::Payment => "payment",
            NotificationCategory::Customer => "customer",
            NotificationCategory::System => "system",
            NotificationCategory::Commission => "commission",
            NotificationCategory::Alert => "alert",
        }
    }
}

impl std::str::FromStr for NotificationCategory {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booking" => Ok(NotificationCategory::Booking),
            "payment" => Ok(NotificationCategory::Payment),
            "customer" => Ok(NotificationCategory::Customer),
            "system" => Ok(NotificationCategory::System),
            "commission" => Ok(NotificationCategory::Commission),
            "alert" => Ok(NotificationCategory::Alert),
            other => Err(crate::DomainError::UnknownNotificationField(
                other.to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl NotificationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPriority::Low => "low",
            NotificationPriority::Normal => "normal",
            NotificationPriority::High => "high",
            NotificationPriority::Urgent => "urgent",
        }
    }
}

impl std::str::FromStr for NotificationPriority {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(NotificationPriority::Low),
            "normal" => Ok(NotificationPriority::Normal),
            "high" => Ok(NotificationPriority::High),
            "urgent" => Ok(NotificationPriority::Urgent),
            other => Err(crate::DomainError::UnknownNotificationField(
                other.to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub is_read: bool,
    pub is_archived: bool,
    pub action_url: Option<String>,
    pub related_entity_id: Option<Uuid>,
    pub related_entity_type: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    #[serde(default = "default_priority")]
    pub priority: NotificationPriority,
    pub action_url: Option<String>,
    pub related_entity_id: Option<Uuid>,
    pub related_entity_type: Option<String>,
    pub metadata: Option<Value>,
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_priority() -> NotificationPriority {
    NotificationPriority::Normal
}

/// Archived and expired notifications are hidden unless explicitly asked for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationFilter {
    pub kind: Option<NotificationKind>,
    pub category: Option<NotificationCategory>,
    pub priority: Option<NotificationPriority>,
    pub is_read: Option<bool>,
    pub include_archived: Option<bool>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}
