use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::{DateTime, NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use sahel_api::{app, AppState};
use sahel_domain::booking::{
    Booking, BookingFilter, BookingStatus, BookingType, BookingUpdate, NewBooking,
};
use sahel_domain::commission::{
    CommissionEntry, CommissionHistoryFilter, CommissionSetting, CommissionSettingUpdate,
    NewCommissionSetting,
};
use sahel_domain::notification::{NewNotification, Notification, NotificationFilter};
use sahel_domain::page::Page;
use sahel_domain::payment::{Payment, PaymentFilter, PaymentStatus};
use sahel_domain::repository::{
    BookingRepository, CommissionRepository, NotificationRepository, PaymentRepository, RepoResult,
};

fn ts(day: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
}

fn booking(email: &str, amount: i64, day: &str) -> Booking {
    Booking {
        id: Uuid::new_v4(),
        booking_type: BookingType::Package,
        status: BookingStatus::Confirmed,
        guest_email: Some(email.to_string()),
        guest_phone: None,
        total_amount: amount,
        commission_amount: None,
        commission_percentage: None,
        passenger_details: None,
        flight_details: None,
        metadata: None,
        created_at: ts(day),
        updated_at: ts(day),
    }
}

// In-memory stand-ins for the Postgres repositories, enough to drive the
// routers end to end.

#[derive(Default)]
struct FakeBookings {
    rows: Mutex<Vec<Booking>>,
}

impl FakeBookings {
    fn seeded(rows: Vec<Booking>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    fn matches(booking: &Booking, filter: &BookingFilter) -> bool {
        if let Some(status) = filter.status {
            if booking.status != status {
                return false;
            }
        }
        if let Some(kind) = filter.booking_type {
            if booking.booking_type != kind {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let email_hit = booking
                .guest_email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&needle));
            let phone_hit = booking
                .guest_phone
                .as_deref()
                .is_some_and(|phone| phone.to_lowercase().contains(&needle));
            if !email_hit && !phone_hit {
                return false;
            }
        }
        if let Some(email) = &filter.customer_email {
            let needle = email.to_lowercase();
            if !booking
                .guest_email
                .as_deref()
                .is_some_and(|guest| guest.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        if let Some(from) = filter.date_from {
            if booking.created_at < from {
                return false;
            }
        }
        if let Some(to) = filter.date_to {
            if booking.created_at > to {
                return false;
            }
        }
        if let Some(min) = filter.amount_min {
            if booking.total_amount < min {
                return false;
            }
        }
        if let Some(max) = filter.amount_max {
            if booking.total_amount > max {
                return false;
            }
        }
        true
    }

    fn matching(&self, filter: &BookingFilter) -> Vec<Booking> {
        let mut rows: Vec<Booking> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| Self::matches(row, filter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

#[async_trait]
impl BookingRepository for FakeBookings {
    async fn list(
        &self,
        page: u32,
        limit: u32,
        filter: &BookingFilter,
    ) -> RepoResult<Page<Booking>> {
        let rows = self.matching(filter);
        let count = rows.len() as i64;
        let offset = (page.max(1) - 1) as usize * limit.max(1) as usize;
        let slice: Vec<Booking> = rows
            .into_iter()
            .skip(offset)
            .take(limit.max(1) as usize)
            .collect();
        Ok(Page::new(slice, count, page, limit))
    }

    async fn fetch_matching(&self, filter: &BookingFilter) -> RepoResult<Vec<Booking>> {
        Ok(self.matching(filter))
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Booking>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }

    async fn create(&self, booking: NewBooking) -> RepoResult<Booking> {
        let now = Utc::now();
        let row = Booking {
            id: Uuid::new_v4(),
            booking_type: booking.booking_type,
            status: BookingStatus::Pending,
            guest_email: booking.guest_email,
            guest_phone: booking.guest_phone,
            total_amount: booking.total_amount,
            commission_amount: None,
            commission_percentage: None,
            passenger_details: booking.passenger_details,
            flight_details: booking.flight_details,
            metadata: booking.metadata,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, update: BookingUpdate) -> RepoResult<Option<Booking>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            row.status = status;
        }
        if let Some(email) = update.guest_email {
            row.guest_email = Some(email);
        }
        if let Some(phone) = update.guest_phone {
            row.guest_phone = Some(phone);
        }
        if let Some(amount) = update.total_amount {
            row.total_amount = amount;
        }
        if let Some(details) = update.passenger_details {
            row.passenger_details = Some(details);
        }
        if let Some(details) = update.flight_details {
            row.flight_details = Some(details);
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> RepoResult<Option<Booking>> {
        self.update(
            id,
            BookingUpdate {
                status: Some(status),
                ..BookingUpdate::default()
            },
        )
        .await
    }

    async fn for_customer(&self, email: &str) -> RepoResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.guest_email.as_deref() == Some(email))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn latest_for_customer(&self, email: &str) -> RepoResult<Option<Booking>> {
        Ok(self.for_customer(email).await?.into_iter().next())
    }

    async fn set_metadata(&self, id: Uuid, metadata: Value) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
            row.metadata = Some(metadata);
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakePayments {
    rows: Mutex<Vec<Payment>>,
}

#[async_trait]
impl PaymentRepository for FakePayments {
    async fn list(
        &self,
        page: u32,
        limit: u32,
        filter: &PaymentFilter,
    ) -> RepoResult<Page<Payment>> {
        let rows: Vec<Payment> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| filter.status.map_or(true, |status| row.status == status))
            .cloned()
            .collect();
        let count = rows.len() as i64;
        Ok(Page::new(rows, count, page, limit))
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Payment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }

    async fn for_booking(&self, booking_id: Uuid) -> RepoResult<Vec<Payment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.booking_id == booking_id)
            .cloned()
            .collect())
    }

    async fn fetch_since(&self, start: DateTime<Utc>) -> RepoResult<Vec<Payment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.created_at >= start)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct FakeCommissions {
    settings: Mutex<Vec<CommissionSetting>>,
    entries: Mutex<Vec<CommissionEntry>>,
}

#[async_trait]
impl CommissionRepository for FakeCommissions {
    async fn settings(&self) -> RepoResult<Vec<CommissionSetting>> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn active_settings(&self) -> RepoResult<Vec<CommissionSetting>> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .iter()
            .filter(|setting| setting.is_active)
            .cloned()
            .collect())
    }

    async fn create_setting(&self, setting: NewCommissionSetting) -> RepoResult<CommissionSetting> {
        let now = Utc::now();
        let row = CommissionSetting {
            id: Uuid::new_v4(),
            service_type: setting.service_type,
            commission_type: setting.commission_type,
            value: setting.value,
            is_active: true,
            valid_from: setting.valid_from.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        self.settings.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_setting(
        &self,
        id: Uuid,
        update: CommissionSettingUpdate,
    ) -> RepoResult<Option<CommissionSetting>> {
        let mut settings = self.settings.lock().unwrap();
        let Some(setting) = settings.iter_mut().find(|setting| setting.id == id) else {
            return Ok(None);
        };
        if let Some(kind) = update.commission_type {
            setting.commission_type = kind;
        }
        if let Some(value) = update.value {
            setting.value = value;
        }
        if let Some(is_active) = update.is_active {
            setting.is_active = is_active;
        }
        setting.updated_at = Utc::now();
        Ok(Some(setting.clone()))
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
        let mut rows: Vec<CommissionEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| {
                filter
                    .service_type
                    .map_or(true, |kind| entry.service_type == kind)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn entries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<CommissionEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.created_at >= start && entry.created_at < end)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct FakeNotifications {
    rows: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationRepository for FakeNotifications {
    async fn list(&self, filter: &NotificationFilter) -> RepoResult<Vec<Notification>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| !row.is_archived || filter.include_archived.unwrap_or(false))
            .filter(|row| filter.is_read.map_or(true, |read| row.is_read == read))
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Notification>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }

    async fn create(&self, notification: NewNotification) -> RepoResult<Notification> {
        let row = Notification {
            id: Uuid::new_v4(),
            kind: notification.kind,
            category: notification.category,
            title: notification.title,
            message: notification.message,
            priority: notification.priority,
            is_read: false,
            is_archived: false,
            action_url: notification.action_url,
            related_entity_id: notification.related_entity_id,
            related_entity_type: notification.related_entity_type,
            metadata: notification.metadata,
            created_at: Utc::now(),
            read_at: None,
            archived_at: None,
            expires_at: notification.expires_at,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn mark_read(&self, id: Uuid) -> RepoResult<Option<Notification>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        row.is_read = true;
        row.read_at = Some(Utc::now());
        Ok(Some(row.clone()))
    }

    async fn mark_all_read(&self) -> RepoResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut marked = 0;
        for row in rows.iter_mut().filter(|row| !row.is_read) {
            row.is_read = true;
            row.read_at = Some(Utc::now());
            marked += 1;
        }
        Ok(marked)
    }

    async fn archive(&self, id: Uuid) -> RepoResult<Option<Notification>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        row.is_archived = true;
        row.archived_at = Some(Utc::now());
        Ok(Some(row.clone()))
    }

    async fn unread_count(&self) -> RepoResult<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| !row.is_read && !row.is_archived)
            .count() as i64)
    }
}

fn state_with_bookings(rows: Vec<Booking>) -> AppState {
    AppState {
        bookings: Arc::new(FakeBookings::seeded(rows)),
        payments: Arc::new(FakePayments::default()),
        commissions: Arc::new(FakeCommissions::default()),
        notifications: Arc::new(FakeNotifications::default()),
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = app(state_with_bookings(vec![]));
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn customers_list_folds_bookings_by_email() {
    let mut early = booking("awa@example.com", 200_000, "2025-03-01");
    early.passenger_details = Some(json!({"passengers": [{"name": "Awa Diallo"}]}));
    let late = booking("awa@example.com", 100_000, "2025-05-01");
    let other = booking("moussa@example.com", 50_000, "2025-04-01");

    let app = app(state_with_bookings(vec![early, late, other]));
    let response = app.oneshot(get("/v1/customers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["customer_email"], "awa@example.com");
    assert_eq!(data[0]["customer_name"], "Awa Diallo");
    assert_eq!(data[0]["booking_count"], 2);
    assert_eq!(data[0]["total_spent"], 300_000);
    assert_eq!(data[1]["customer_email"], "moussa@example.com");
}

#[tokio::test]
async fn customers_search_narrows_the_fold() {
    let rows = vec![
        booking("awa@example.com", 200_000, "2025-03-01"),
        booking("moussa@example.com", 50_000, "2025-04-01"),
    ];
    let app = app(state_with_bookings(rows));
    let response = app
        .oneshot(get("/v1/customers?search=moussa"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["customer_email"], "moussa@example.com");
}

#[tokio::test]
async fn unknown_customer_is_404() {
    let app = app(state_with_bookings(vec![]));
    let response = app
        .oneshot(get("/v1/customers/nobody@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tag_mutations_land_on_the_latest_booking() {
    let rows = vec![
        booking("awa@example.com", 200_000, "2025-03-01"),
        booking("awa@example.com", 100_000, "2025-05-01"),
    ];
    let app = app(state_with_bookings(rows));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/customers/awa@example.com/tags",
            json!({"tag": "vip"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/v1/customers/awa@example.com"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["tags"], json!(["vip"]));

    // Removing the tag leaves the customer with none.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/customers/awa@example.com/tags/vip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/v1/customers/awa@example.com"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["tags"], json!([]));
}

#[tokio::test]
async fn notes_update_round_trips_through_profile() {
    let rows = vec![booking("awa@example.com", 200_000, "2025-03-01")];
    let app = app(state_with_bookings(rows));

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/v1/customers/awa@example.com/notes",
            json!({"notes": "prefers morning departures"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/v1/customers/awa@example.com"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["notes"], "prefers morning departures");
}

#[tokio::test]
async fn communications_append_to_the_history() {
    let rows = vec![booking("awa@example.com", 200_000, "2025-03-01")];
    let app = app(state_with_bookings(rows));

    for note in ["called about visa", "sent quote"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/customers/awa@example.com/communications",
                json!({"channel": "phone", "note": note}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(get("/v1/customers/awa@example.com"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let history = body["bookings"][0]["metadata"]["communication_history"]
        .as_array()
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["note"], "called about visa");
    assert_eq!(history[1]["note"], "sent quote");
}

#[tokio::test]
async fn bookings_list_filters_by_inferred_subtype() {
    let mut umra = booking("awa@example.com", 200_000, "2025-03-01");
    umra.flight_details = Some(json!({"destination": "Mecque"}));
    let general = booking("moussa@example.com", 400_000, "2025-04-01");

    let app = app(state_with_bookings(vec![umra, general]));
    let response = app
        .oneshot(get("/v1/bookings?package_subtype=umra"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["guest_email"], "awa@example.com");
    assert_eq!(data[0]["package_subtype"], "umra");
}

#[tokio::test]
async fn create_booking_rejects_negative_amount() {
    let app = app(state_with_bookings(vec![]));
    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/bookings",
            json!({"booking_type": "flight", "total_amount": -5_000}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_booking_is_404() {
    let app = app(state_with_bookings(vec![]));
    let uri = format!("/v1/bookings/{}", Uuid::new_v4());
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_cancels_instead_of_removing() {
    let row = booking("awa@example.com", 200_000, "2025-03-01");
    let id = row.id;
    let app = app(state_with_bookings(vec![row]));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/bookings/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "cancelled");

    // Still fetchable afterwards.
    let response = app
        .oneshot(get(&format!("/v1/bookings/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn payment_stats_reduce_the_fetched_rows() {
    let now = Utc::now();
    let payments = FakePayments {
        rows: Mutex::new(vec![
            Payment {
                id: Uuid::new_v4(),
                booking_id: Uuid::new_v4(),
                amount: 100_000,
                status: PaymentStatus::Success,
                payment_method: Some("wave".to_string()),
                transaction_reference: None,
                created_at: now,
                updated_at: now,
            },
            Payment {
                id: Uuid::new_v4(),
                booking_id: Uuid::new_v4(),
                amount: 40_000,
                status: PaymentStatus::Failed,
                payment_method: None,
                transaction_reference: None,
                created_at: now,
                updated_at: now,
            },
        ]),
    };
    let state = AppState {
        bookings: Arc::new(FakeBookings::default()),
        payments: Arc::new(payments),
        commissions: Arc::new(FakeCommissions::default()),
        notifications: Arc::new(FakeNotifications::default()),
    };

    let response = app(state)
        .oneshot(get("/v1/payments/stats?period=month"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_amount"], 100_000);
    assert_eq!(body["failed"], 1);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn commission_settings_lifecycle() {
    let app = app(state_with_bookings(vec![]));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/commissions/settings",
            json!({"service_type": "package", "commission_type": "percentage", "value": 5.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["is_active"], true);
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/commissions/settings/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["is_active"], false);
}

#[tokio::test]
async fn negative_commission_value_is_rejected() {
    let app = app(state_with_bookings(vec![]));
    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/commissions/settings",
            json!({"service_type": "package", "commission_type": "fixed", "value": -1.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notification_read_flow_updates_the_count() {
    let app = app(state_with_bookings(vec![]));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/notifications",
            json!({
                "kind": "warning",
                "category": "payment",
                "title": "Payment failed",
                "message": "Wave payment for booking was declined"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["priority"], "normal");
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get("/v1/notifications/unread-count"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["unread"], 1);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/v1/notifications/{id}/read"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/v1/notifications/unread-count"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["unread"], 0);
}
