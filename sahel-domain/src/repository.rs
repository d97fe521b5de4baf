use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::error::Error;
use uuid::Uuid;

use crate::booking::{Booking, BookingFilter, BookingStatus, BookingUpdate, NewBooking};
use crate::commission::{
    CommissionEntry, CommissionHistoryFilter, CommissionSetting, CommissionSettingUpdate,
    NewCommissionSetting,
};
use crate::notification::{NewNotification, Notification, NotificationFilter};
use crate::page::Page;
use crate::payment::{Payment, PaymentFilter};

pub type RepoResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list(&self, page: u32, limit: u32, filter: &BookingFilter) -> RepoResult<Page<Booking>>;

    /// Every row matching the filter, newest first, no pagination. Feeds the
    /// customer aggregation, which must fold the full matching set.
    async fn fetch_matching(&self, filter: &BookingFilter) -> RepoResult<Vec<Booking>>;

    async fn get(&self, id: Uuid) -> RepoResult<Option<Booking>>;

    async fn create(&self, booking: NewBooking) -> RepoResult<Booking>;

    async fn update(&self, id: Uuid, update: BookingUpdate) -> RepoResult<Option<Booking>>;

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> RepoResult<Option<Booking>>;

    /// Bookings of one customer by exact email, newest first.
    async fn for_customer(&self, email: &str) -> RepoResult<Vec<Booking>>;

    /// The customer's most recent booking row, which carries the ad hoc
    /// customer metadata.
    async fn latest_for_customer(&self, email: &str) -> RepoResult<Option<Booking>>;

    async fn set_metadata(&self, id: Uuid, metadata: Value) -> RepoResult<()>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn list(&self, page: u32, limit: u32, filter: &PaymentFilter) -> RepoResult<Page<Payment>>;

    async fn get(&self, id: Uuid) -> RepoResult<Option<Payment>>;

    /// Payments attached to one booking, for the booking detail view.
    async fn for_booking(&self, booking_id: Uuid) -> RepoResult<Vec<Payment>>;

    /// Payments created at or after `start`, for the stats reduction.
    async fn fetch_since(&self, start: DateTime<Utc>) -> RepoResult<Vec<Payment>>;
}

#[async_trait]
pub trait CommissionRepository: Send + Sync {
    async fn settings(&self) -> RepoResult<Vec<CommissionSetting>>;

    async fn active_settings(&self) -> RepoResult<Vec<CommissionSetting>>;

    async fn create_setting(&self, setting: NewCommissionSetting) -> RepoResult<CommissionSetting>;

    async fn update_setting(
        &self,
        id: Uuid,
        update: CommissionSettingUpdate,
    ) -> RepoResult<Option<CommissionSetting>>;

    async fn deactivate_setting(&self, id: Uuid) -> RepoResult<Option<CommissionSetting>>;

    async fn history(&self, filter: &CommissionHistoryFilter) -> RepoResult<Vec<CommissionEntry>>;

    async fn entries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<CommissionEntry>>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn list(&self, filter: &NotificationFilter) -> RepoResult<Vec<Notification>>;

    async fn get(&self, id: Uuid) -> RepoResult<Option<Notification>>;

    async fn create(&self, notification: NewNotification) -> RepoResult<Notification>;

    async fn mark_read(&self, id: Uuid) -> RepoResult<Option<Notification>>;

    async fn mark_all_read(&self) -> RepoResult<u64>;

    async fn archive(&self, id: Uuid) -> RepoResult<Option<Notification>>;

    async fn unread_count(&self) -> RepoResult<i64>;
}
