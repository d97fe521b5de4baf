//! Customer aggregation: one row per real customer, most recently active
//! first, derived entirely from booking rows. The guest email is the natural
//! key; nothing here touches the store.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::collections::{HashMap, HashSet};

use sahel_domain::booking::Booking;
use sahel_domain::customer::{Customer, CustomerStats};
use sahel_domain::page::Page;

/// Best-effort display name: first passenger, else the email local part,
/// else a fixed fallback the UI can always render.
pub fn display_name(booking: &Booking) -> String {
    if let Some(name) = booking.first_passenger_name() {
        return name.to_string();
    }
    match booking
        .guest_email
        .as_deref()
        .and_then(|email| email.split('@').next())
    {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => "Client".to_string(),
    }
}

fn matches_search(booking: &Booking, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let email_hit = booking
        .guest_email
        .as_deref()
        .is_some_and(|email| email.to_lowercase().contains(&needle));
    let phone_hit = booking
        .guest_phone
        .as_deref()
        .is_some_and(|phone| phone.to_lowercase().contains(&needle));
    email_hit || phone_hit
}

/// Fold one booking into an existing customer entry.
fn fold_into(customer: &mut Customer, booking: &Booking) {
    customer.booking_count += 1;
    customer.total_spent += booking.total_amount;
    if customer
        .last_booking_date
        .map_or(true, |current| booking.created_at > current)
    {
        customer.last_booking_date = Some(booking.created_at);
    }
    if let Some(phone) = booking.guest_phone.as_deref() {
        if !phone.is_empty() {
            customer.customer_phone = phone.to_string();
        }
    }
    for tag in booking.customer_tags() {
        if !customer.tags.contains(&tag) {
            customer.tags.push(tag);
        }
    }
    if customer.notes.is_none() {
        customer.notes = booking.customer_notes().map(str::to_string);
    }
}

fn seed_customer(email: &str, booking: &Booking) -> Customer {
    let mut customer = Customer {
        customer_email: email.to_string(),
        customer_name: display_name(booking),
        customer_phone: String::new(),
        booking_count: 0,
        total_spent: 0,
        last_booking_date: None,
        tags: Vec::new(),
        notes: None,
    };
    fold_into(&mut customer, booking);
    customer
}

/// De-duplicate bookings into customers and page the result.
///
/// The search filter applies to the raw bookings before the fold, so a
/// customer appears as soon as one of their bookings matches even when the
/// others would not. Bookings with no guest email are dropped silently.
/// Output is ordered by last booking date descending, dateless rows last;
/// `count` is the full distinct-customer count before the slice.
pub fn aggregate(
    bookings: &[Booking],
    page: u32,
    limit: u32,
    search: Option<&str>,
) -> Page<Customer> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut customers: Vec<Customer> = Vec::new();

    for booking in bookings {
        if let Some(needle) = search {
            if !matches_search(booking, needle) {
                continue;
            }
        }
        let Some(email) = booking.guest_email.as_deref().filter(|e| !e.is_empty()) else {
            continue;
        };
        match index.get(email) {
            Some(&pos) => fold_into(&mut customers[pos], booking),
            None => {
                index.insert(email.to_string(), customers.len());
                customers.push(seed_customer(email, booking));
            }
        }
    }

    // Stable sort keeps first-seen order between customers with equal dates.
    customers.sort_by(|a, b| match (a.last_booking_date, b.last_booking_date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let count = customers.len() as i64;
    let limit_nz = limit.max(1) as usize;
    let start = (page.max(1) as usize - 1) * limit_nz;
    let data: Vec<Customer> = customers.into_iter().skip(start).take(limit_nz).collect();

    Page::new(data, count, page, limit)
}

/// Single-customer view from that customer's bookings, newest first as the
/// store returns them. `None` when the slice is empty.
pub fn profile(bookings: &[Booking]) -> Option<Customer> {
    let newest = bookings.first()?;
    let email = newest.guest_email.as_deref().unwrap_or_default();
    let mut customer = seed_customer(email, newest);
    for booking in &bookings[1..] {
        fold_into(&mut customer, booking);
    }
    Some(customer)
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Dashboard-level customer statistics over the full booking set.
pub fn stats(bookings: &[Booking], now: DateTime<Utc>) -> CustomerStats {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut total_revenue: i64 = 0;
    let month_start = start_of_month(now);
    let mut new_this_month: HashSet<&str> = HashSet::new();

    for booking in bookings {
        total_revenue += booking.total_amount;
        let Some(email) = booking.guest_email.as_deref().filter(|e| !e.is_empty()) else {
            continue;
        };
        *counts.entry(email).or_insert(0) += 1;
        if booking.created_at >= month_start {
            new_this_month.insert(email);
        }
    }

    let total_customers = counts.len() as u64;
    let recurring_customers = counts.values().filter(|&&count| count > 1).count() as u64;
    let average_order_value = if bookings.is_empty() {
        0.0
    } else {
        total_revenue as f64 / bookings.len() as f64
    };
    let conversion_rate = if total_customers == 0 {
        0.0
    } else {
        recurring_customers as f64 / total_customers as f64 * 100.0
    };

    CustomerStats {
        total_customers,
        recurring_customers,
        average_order_value,
        new_customers_this_month: new_this_month.len() as u64,
        conversion_rate,
    }
}
