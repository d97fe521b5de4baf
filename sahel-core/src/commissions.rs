//! Commission reporting reductions: per-service totals and the monthly
//! revenue rollup the commissions page charts.

use chrono::Datelike;
use serde::Serialize;

use sahel_domain::booking::BookingType;
use sahel_domain::commission::CommissionEntry;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ServiceBreakdown {
    pub flight: i64,
    pub hotel: i64,
    pub package: i64,
}

impl ServiceBreakdown {
    fn slot(&mut self, service: BookingType) -> &mut i64 {
        match service {
            BookingType::Flight => &mut self.flight,
            BookingType::Hotel => &mut self.hotel,
            BookingType::Package => &mut self.package,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CommissionStats {
    pub total: i64,
    pub by_type: ServiceBreakdown,
    pub count: ServiceBreakdown,
}

pub fn stats(entries: &[CommissionEntry]) -> CommissionStats {
    let mut stats = CommissionStats::default();
    for entry in entries {
        stats.total += entry.commission_amount;
        *stats.by_type.slot(entry.service_type) += entry.commission_amount;
        *stats.count.slot(entry.service_type) += 1;
    }
    stats
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MonthBucket {
    /// 1-based calendar month.
    pub month: u32,
    pub flight: i64,
    pub hotel: i64,
    pub package: i64,
    pub total: i64,
}

/// Twelve buckets, one per month of `year`; entries from other years are
/// ignored so callers can pass a loosely filtered slice.
pub fn monthly_revenue(entries: &[CommissionEntry], year: i32) -> Vec<MonthBucket> {
    let mut months: Vec<MonthBucket> = (1..=12)
        .map(|month| MonthBucket {
            month,
            flight: 0,
            hotel: 0,
            package: 0,
            total: 0,
        })
        .collect();

    for entry in entries {
        if entry.created_at.year() != year {
            continue;
        }
        let bucket = &mut months[entry.created_at.month0() as usize];
        match entry.service_type {
            BookingType::Flight => bucket.flight += entry.commission_amount,
            BookingType::Hotel => bucket.hotel += entry.commission_amount,
            BookingType::Package => bucket.package += entry.commission_amount,
        }
        bucket.total += entry.commission_amount;
    }

    months
}
