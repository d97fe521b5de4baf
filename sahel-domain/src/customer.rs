use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer is a virtual entity: bookings grouped on guest email. It is
/// recomputed on every read and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub booking_count: u64,
    pub total_spent: i64,
    pub last_booking_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerStats {
    pub total_customers: u64,
    /// Customers with more than one booking.
    pub recurring_customers: u64,
    /// Revenue over all booking rows divided by the row count.
    pub average_order_value: f64,
    /// Distinct emails whose first booking falls in the current month.
    pub new_customers_this_month: u64,
    /// Recurring over total, as a percentage.
    pub conversion_rate: f64,
}
