//! Booking window and cost estimation.
//!
//! Both figures are advisory, shown to the user before submission; the
//! remote authority recomputes the real cost on creation.

use chrono::NaiveDate;

/// Whole days between two dates, floored at zero. Never fails: a reversed
/// or zero-length range yields 0.
pub fn booking_window_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days().max(0)
}

/// Estimated total cost for a booking window. Zero when `days` is zero;
/// saturates at the i64 bounds rather than overflowing.
pub fn estimate_cost(days: i64, price_per_day: i64) -> i64 {
    days.saturating_mul(price_per_day)
}
