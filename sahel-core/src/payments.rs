//! Payment reporting reductions over rows already fetched for a period.

use serde::Serialize;

use sahel_domain::payment::{Payment, PaymentStatus};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PaymentStats {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
    pub pending: u64,
    pub cancelled: u64,
    /// Sum over successful payments only.
    pub total_amount: i64,
    pub average_amount: f64,
    pub success_rate: f64,
}

/// Single-pass tally of a payment slice. Amounts only count once a payment
/// succeeded; failed and pending rows affect the rate, not the totals.
pub fn stats(payments: &[Payment]) -> PaymentStats {
    let mut stats = PaymentStats {
        total: payments.len() as u64,
        ..PaymentStats::default()
    };

    for payment in payments {
        match payment.status {
            PaymentStatus::Success => {
                stats.success += 1;
                stats.total_amount += payment.amount;
            }
            PaymentStatus::Failed => stats.failed += 1,
            PaymentStatus::Pending => stats.pending += 1,
            PaymentStatus::Cancelled => stats.cancelled += 1,
        }
    }

    if stats.success > 0 {
        stats.average_amount = stats.total_amount as f64 / stats.success as f64;
        stats.success_rate = stats.success as f64 / stats.total as f64 * 100.0;
    }

    stats
}
