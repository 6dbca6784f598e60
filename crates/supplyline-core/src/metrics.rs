//! Performance metrics aggregation.
//!
//! The one piece of domain computation in the system: fold a vendor's full
//! purchase-order history into four quality signals. Pure function; the
//! caller stamps the snapshot timestamp and persists the result.

use crate::model::{OrderStatus, PurchaseOrder};

/// Computed vendor quality signals.
///
/// The two rates are absent when the vendor has no completed order: a ratio
/// over zero completed orders has no value, so it is stored as NULL rather
/// than a fabricated number. The averages fall back to 0 instead, matching
/// the original service contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceMetrics {
    /// Share of completed orders delivered no later than issued, in percent.
    pub on_time_delivery_rate: Option<f64>,
    /// Mean quality rating over rated completed orders, one decimal.
    pub quality_rating_avg: f64,
    /// Mean issue-to-acknowledgment lag over completed orders, in hours.
    pub average_response_time: f64,
    /// Share of all orders that reached completion, in percent.
    pub fulfillment_rate: Option<f64>,
}

/// Aggregate a vendor's order history.
///
/// Only orders with status `completed` contribute to the signals; `total`
/// counts every status for the fulfillment denominator.
pub fn compute(orders: &[PurchaseOrder]) -> PerformanceMetrics {
    let total = orders.len();

    let completed: Vec<&PurchaseOrder> = orders
        .iter()
        .filter(|po| po.status == OrderStatus::Completed)
        .collect();

    let on_time = completed
        .iter()
        .filter(|po| matches!(po.delivery_date, Some(d) if po.issue_date <= d))
        .count();

    let (on_time_delivery_rate, fulfillment_rate) = if completed.is_empty() {
        (None, None)
    } else {
        (
            Some(on_time as f64 / completed.len() as f64 * 100.0),
            Some(completed.len() as f64 / total as f64 * 100.0),
        )
    };

    let ratings: Vec<f64> = completed.iter().filter_map(|po| po.quality_rating).collect();
    let quality_rating_avg = if ratings.is_empty() {
        0.0
    } else {
        round_one(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };

    let response_hours: Vec<f64> = completed
        .iter()
        .filter_map(|po| {
            po.acknowledgment_date
                .map(|ack| (ack - po.issue_date).num_seconds() as f64 / 3600.0)
        })
        .collect();
    let average_response_time = if response_hours.is_empty() {
        0.0
    } else {
        response_hours.iter().sum::<f64>() / response_hours.len() as f64
    };

    PerformanceMetrics {
        on_time_delivery_rate,
        quality_rating_avg,
        average_response_time,
        fulfillment_rate,
    }
}

fn round_one(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
