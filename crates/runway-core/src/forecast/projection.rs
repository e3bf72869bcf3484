//! Stationary weekly projection

use crate::models::RecurringItem;

/// Average weeks per month, used to convert monthly totals to weekly
const WEEKS_PER_MONTH: f64 = 4.33;

/// Project the expected per-week cash delta for a set of recurring items.
///
/// Each item's occurrence count is interpreted over the 12-month lookback
/// window, so `avg_amount * occurrences / 12` estimates its monthly
/// contribution. The sum is divided by 4.33 to get a weekly figure.
///
/// The estimate is stationary: callers apply the same value to every
/// forecast week. Empty input projects 0.
pub fn project_weekly(recurring: &[RecurringItem]) -> i64 {
    let total_monthly: f64 = recurring
        .iter()
        .map(|item| item.avg_amount as f64 * item.occurrences as f64 / 12.0)
        .sum();

    (total_monthly / WEEKS_PER_MONTH).round() as i64
}
