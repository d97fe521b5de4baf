use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::DomainError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Flight,
    Hotel,
    Package,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Flight => "flight",
            BookingType::Hotel => "hotel",
            BookingType::Package => "package",
        }
    }
}

impl std::str::FromStr for BookingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flight" => Ok(BookingType::Flight),
            "hotel" => Ok(BookingType::Hotel),
            "package" => Ok(BookingType::Package),
            other => Err(DomainError::UnknownBookingType(other.to_string())),
        }
    }
}

impl std::fmt::Display for BookingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Failed,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Failed => "failed",
            BookingStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "failed" => Ok(BookingStatus::Failed),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(DomainError::UnknownBookingStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchased travel service. Amounts are XOF minor units; refund rows may
/// carry negative totals and are never clamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub booking_type: BookingType,
    pub status: BookingStatus,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub total_amount: i64,
    pub commission_amount: Option<i64>,
    pub commission_percentage: Option<f64>,
    /// Loosely structured payload: `passengers[0].name` supplies the display
    /// name, `packageType` an explicit subtype when the seller recorded one.
    pub passenger_details: Option<Value>,
    /// May carry a free-text `destination` string.
    pub flight_details: Option<Value>,
    /// Ad hoc customer metadata piggybacked on the row: `customer_tags`,
    /// `customer_notes`, `communication_history`.
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Name of the first passenger, when the payload has one.
    pub fn first_passenger_name(&self) -> Option<&str> {
        self.passenger_details
            .as_ref()?
            .get("passengers")?
            .get(0)?
            .get("name")?
            .as_str()
            .filter(|name| !name.is_empty())
    }

    /// Number of passengers in the payload; rows with no passenger list
    /// count as a single traveller.
    pub fn passenger_count(&self) -> usize {
        self.passenger_details
            .as_ref()
            .and_then(|details| details.get("passengers"))
            .and_then(Value::as_array)
            .map(|passengers| passengers.len())
            .filter(|len| *len > 0)
            .unwrap_or(1)
    }

    pub fn destination(&self) -> Option<&str> {
        self.flight_details
            .as_ref()?
            .get("destination")?
            .as_str()
    }

    pub fn explicit_package_type(&self) -> Option<&str> {
        self.passenger_details
            .as_ref()?
            .get("packageType")?
            .as_str()
    }

    /// Customer tags stashed in the row metadata.
    pub fn customer_tags(&self) -> Vec<String> {
        self.metadata
            .as_ref()
            .and_then(|meta| meta.get("customer_tags"))
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Customer notes stashed in the row metadata.
    pub fn customer_notes(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get("customer_notes")?
            .as_str()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub booking_type: BookingType,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub total_amount: i64,
    pub passenger_details: Option<Value>,
    pub flight_details: Option<Value>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingUpdate {
    pub status: Option<BookingStatus>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub total_amount: Option<i64>,
    pub passenger_details: Option<Value>,
    pub flight_details: Option<Value>,
}

/// Filters accepted by the booking list and by the unpaginated fetch that
/// feeds the customer aggregation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub booking_type: Option<BookingType>,
    /// Case-insensitive substring over guest email or phone.
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive; the store extends it to 23:59:59.999 of that day.
    pub date_to: Option<DateTime<Utc>>,
    pub amount_min: Option<i64>,
    pub amount_max: Option<i64>,
    /// Case-insensitive substring over guest email only.
    pub customer_email: Option<String>,
}
