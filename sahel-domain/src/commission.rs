use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::BookingType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommissionType {
    Percentage,
    Fixed,
}

impl CommissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionType::Percentage => "percentage",
            CommissionType::Fixed => "fixed",
        }
    }
}

impl std::str::FromStr for CommissionType {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(CommissionType::Percentage),
            "fixed" => Ok(CommissionType::Fixed),
            other => Err(crate::DomainError::UnknownCommissionType(other.to_string())),
        }
    }
}

/// Configured commission rate for one service type. Settings are versioned
/// by `valid_from` and soft-disabled rather than deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionSetting {
    pub id: Uuid,
    pub service_type: BookingType,
    pub commission_type: CommissionType,
    pub value: f64,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCommissionSetting {
    pub service_type: BookingType,
    pub commission_type: CommissionType,
    pub value: f64,
    pub valid_from: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommissionSettingUpdate {
    pub commission_type: Option<CommissionType>,
    pub value: Option<f64>,
    pub is_active: Option<bool>,
}

/// One commission actually taken on a booking, recorded upstream when the
/// booking was priced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionEntry {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub service_type: BookingType,
    pub commission_amount: i64,
    pub base_amount: i64,
    pub applied_percentage: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommissionHistoryFilter {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub service_type: Option<BookingType>,
    pub limit: Option<i64>,
}
