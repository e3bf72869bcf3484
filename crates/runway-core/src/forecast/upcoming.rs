//! Upcoming payment projection
//!
//! A calendar-date variant of recurrence detection: instead of spreading
//! recurring amounts across weekly buckets, this extrapolates the literal
//! next occurrence date of each recurring expense pattern and reports the
//! ones landing within the next four weeks.

use std::collections::HashMap;

use chrono::{Duration, Months, NaiveDate, Utc};

use super::recurrence::{grouping_key, KeyStrategy, MIN_OCCURRENCES};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Transaction, UpcomingPayment};

/// Upcoming-payments projection configuration
#[derive(Debug, Clone)]
pub struct UpcomingConfig {
    /// Expense lookback window in months
    pub lookback_months: u32,
    /// Minimum plausible average gap between occurrences, in days
    pub min_gap_days: f64,
    /// Maximum plausible average gap between occurrences, in days
    pub max_gap_days: f64,
    /// Only report payments projected within this many days
    pub horizon_days: i64,
    /// Maximum number of payments to report
    pub limit: usize,
}

impl Default for UpcomingConfig {
    fn default() -> Self {
        Self {
            lookback_months: 6,
            min_gap_days: 7.0,
            max_gap_days: 365.0,
            horizon_days: 28,
            limit: 5,
        }
    }
}

/// Load a user's recent expenses and project their upcoming recurring
/// payments as of today.
pub fn upcoming_payments(db: &Database, user_id: i64) -> Result<Vec<UpcomingPayment>> {
    upcoming_payments_as_of(db, user_id, Utc::now().date_naive())
}

/// As [`upcoming_payments`] but with an explicit "today" for determinism.
pub fn upcoming_payments_as_of(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
) -> Result<Vec<UpcomingPayment>> {
    let config = UpcomingConfig::default();
    let since = today
        .checked_sub_months(Months::new(config.lookback_months))
        .ok_or_else(|| Error::InvalidData("lookback window underflows calendar".to_string()))?;
    let expenses = db.list_expenses_since(user_id, since)?;
    Ok(project_upcoming(&expenses, today, &config))
}

/// Project upcoming payments from date-ascending expense transactions.
///
/// Groups by category/contact/description-prefix, keeps groups with at
/// least three members whose average inter-payment gap falls in
/// `[min_gap_days, max_gap_days]`, then walks each group's next date
/// forward past today in whole-day steps of the average gap.
pub fn project_upcoming(
    expenses: &[Transaction],
    today: NaiveDate,
    config: &UpcomingConfig,
) -> Vec<UpcomingPayment> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<&Transaction>> = HashMap::new();
    for tx in expenses {
        let key = grouping_key(tx, KeyStrategy::DescriptionPrefix);
        grouped
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(tx);
    }

    let mut payments = Vec::new();
    for key in order {
        let txns = &grouped[&key];
        if txns.len() < MIN_OCCURRENCES {
            continue;
        }

        // Average gap in days across the date-ascending sequence
        let total_days: i64 = txns
            .windows(2)
            .map(|pair| (pair[1].date - pair[0].date).num_days())
            .sum();
        let avg_gap = total_days as f64 / (txns.len() - 1) as f64;
        if avg_gap < config.min_gap_days || avg_gap > config.max_gap_days {
            continue;
        }

        let sum: i64 = txns.iter().map(|t| t.amount).sum();
        let avg_amount = (sum as f64 / txns.len() as f64).round() as i64;

        let last = txns[txns.len() - 1];
        // Whole-day steps; avg_gap >= 7 guarantees progress
        let step = Duration::days(avg_gap as i64);
        let mut projected_date = last.date + step;
        while projected_date < today {
            projected_date += step;
        }

        let days_until = (projected_date - today).num_days();
        let due_label = if days_until <= 7 {
            if days_until <= 1 {
                "Tomorrow".to_string()
            } else {
                format!("In {} days", days_until)
            }
        } else if days_until <= 14 {
            "Next week".to_string()
        } else if days_until <= 21 {
            "In 2 weeks".to_string()
        } else {
            // Label stays coarse up to the 28-day horizon
            "In 3 weeks".to_string()
        };

        payments.push(UpcomingPayment {
            description: last.description.clone(),
            amount: avg_amount,
            category: key,
            projected_date,
            due_label,
            days_until,
        });
    }

    payments.retain(|p| p.projected_date <= today + Duration::days(config.horizon_days));
    payments.sort_by_key(|p| p.days_until);
    payments.truncate(config.limit);
    payments
}
