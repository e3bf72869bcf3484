//! Forecast engine
//!
//! Orchestrates one forecast run: load 12 months of history, derive the
//! current cash position, detect recurring patterns per kind, project a
//! stationary weekly delta, accumulate running cash over 13 weeks,
//! persist the forecast, then raise alerts against the safety buffer.

use chrono::{Datelike, Duration, Months, NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::locks::{lock_recovering, UserLocks};
use super::projection::project_weekly;
use super::recurrence::{identify_recurring, KeyStrategy};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{
    AlertSeverity, AlertType, Transaction, TransactionKind, User, WeekForecast,
};
use crate::money::fmt_minor;

/// Number of weeks in a forecast
pub const FORECAST_WEEKS: usize = 13;

/// Forecast engine configuration
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Transaction lookback window in months
    pub lookback_months: u32,
    /// Safety buffer in minor units applied when a user has none set
    pub default_buffer: i64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lookback_months: 12,
            default_buffer: 2_500_000, // £25,000 in pence
        }
    }
}

/// Result of one forecast run
#[derive(Debug, Clone)]
pub struct ForecastRun {
    pub forecast_id: i64,
    /// Cumulative sum of the lookback window's transactions. This is a
    /// derived approximation, not a reconciled bank balance.
    pub current_cash: i64,
    pub weeks: Vec<WeekForecast>,
    /// Severity of the alert raised by this run, if any
    pub alert: Option<AlertSeverity>,
}

/// Summary of a batch run across all users
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

/// Generates and persists 13-week forecasts
pub struct ForecastEngine<'a> {
    db: &'a Database,
    config: ForecastConfig,
    locks: UserLocks,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self::with_config(db, ForecastConfig::default())
    }

    pub fn with_config(db: &'a Database, config: ForecastConfig) -> Self {
        Self {
            db,
            config,
            locks: UserLocks::new(),
        }
    }

    /// Share a lock registry across engine instances (e.g. server-wide)
    pub fn with_locks(mut self, locks: UserLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Generate a forecast for one user as of today
    pub fn generate(&self, user_id: i64) -> Result<ForecastRun> {
        self.generate_as_of(user_id, Utc::now().date_naive())
    }

    /// Generate a forecast with an explicit "today" (deterministic for tests)
    pub fn generate_as_of(&self, user_id: i64, today: NaiveDate) -> Result<ForecastRun> {
        // Serialize runs per user so the deactivate-then-insert sequence
        // never races another writer for the same user
        let handle = self.locks.handle(user_id);
        let _guard = lock_recovering(&handle);

        let user = self.db.get_user(user_id)?;

        let since = today
            .checked_sub_months(Months::new(self.config.lookback_months))
            .ok_or_else(|| Error::InvalidData("lookback window underflows calendar".to_string()))?;
        let transactions = self.db.list_transactions_since(user_id, since)?;

        let current_cash: i64 = transactions
            .iter()
            .map(|t| match t.kind {
                TransactionKind::Income => t.amount,
                TransactionKind::Expense => -t.amount,
            })
            .sum();

        let (income, expenses): (Vec<Transaction>, Vec<Transaction>) = transactions
            .into_iter()
            .partition(|t| t.kind == TransactionKind::Income);

        let recurring_income = identify_recurring(&income, KeyStrategy::Uncategorized);
        let recurring_expenses = identify_recurring(&expenses, KeyStrategy::Uncategorized);
        debug!(
            user_id,
            income_patterns = recurring_income.len(),
            expense_patterns = recurring_expenses.len(),
            "Recurring patterns detected"
        );

        // Stationary estimate: the same weekly delta applies to every week
        let weekly_income = project_weekly(&recurring_income);
        let weekly_expenses = project_weekly(&recurring_expenses);

        let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let mut weeks = Vec::with_capacity(FORECAST_WEEKS);
        let mut running_cash = current_cash;
        for i in 0..FORECAST_WEEKS {
            let week_start = monday + Duration::weeks(i as i64);
            let week_end = week_start + Duration::weeks(1);
            running_cash = running_cash + weekly_income - weekly_expenses;
            weeks.push(WeekForecast {
                week_start,
                week_end,
                week_label: format!("Week {} ({})", i + 1, week_start.format("%b %-d")),
                projected: running_cash,
                income: weekly_income,
                expenses: weekly_expenses,
            });
        }

        let forecast_id = self.db.replace_active_forecast(user_id, &weeks)?;
        let alert = self.generate_alerts(&user, &weeks)?;

        info!(
            user_id,
            forecast_id,
            current_cash,
            weekly_income,
            weekly_expenses,
            alert = alert.map(|s| s.as_str()),
            "Forecast generated"
        );

        Ok(ForecastRun {
            forecast_id,
            current_cash,
            weeks,
            alert,
        })
    }

    /// Regenerate forecasts for every user, sequentially.
    ///
    /// One user's failure is logged and counted but never aborts the batch.
    pub fn generate_all(&self) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        for user in self.db.list_users()? {
            match self.generate(user.id) {
                Ok(_) => outcome.succeeded += 1,
                Err(e) => {
                    warn!(user_id = user.id, error = %e, "Forecast generation failed");
                    outcome.failed += 1;
                }
            }
        }
        info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Batch forecast run complete"
        );
        Ok(outcome)
    }

    /// Scan weeks chronologically and raise at most one low-cash alert.
    ///
    /// Undismissed alerts from prior runs are always cleared first, so a
    /// recovered cash position leaves the user with no alerts.
    fn generate_alerts(&self, user: &User, weeks: &[WeekForecast]) -> Result<Option<AlertSeverity>> {
        let buffer = user.cash_buffer.unwrap_or(self.config.default_buffer);

        self.db.delete_undismissed_alerts(user.id)?;

        for week in weeks {
            if week.projected < buffer {
                let severity = if week.projected < 0 {
                    AlertSeverity::Critical
                } else {
                    AlertSeverity::Warning
                };
                let title = match severity {
                    AlertSeverity::Critical => "Cash will run out",
                    AlertSeverity::Warning => "Low cash warning",
                };
                let message = format!(
                    "Projected cash in {}: {}. This is below your safety buffer of {}.",
                    week.week_label,
                    fmt_minor(week.projected),
                    fmt_minor(buffer)
                );
                self.db
                    .create_alert(user.id, AlertType::LowCash, severity, title, &message)?;
                // One alert per run: later weeks, even if worse, stay silent
                return Ok(Some(severity));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTransaction, TransactionSource};

    fn insert(
        db: &Database,
        user: i64,
        date: NaiveDate,
        amount: i64,
        kind: TransactionKind,
        category: &str,
        hash: &str,
    ) {
        db.insert_transaction(
            user,
            &NewTransaction {
                date,
                description: format!("{} payment", category),
                amount,
                kind,
                category: Some(category.to_string()),
                contact: None,
                source: TransactionSource::Sync,
                import_hash: hash.to_string(),
            },
        )
        .unwrap();
    }

    fn seed_monthly(
        db: &Database,
        user: i64,
        today: NaiveDate,
        amount: i64,
        kind: TransactionKind,
        category: &str,
    ) {
        // Twelve monthly occurrences inside the lookback window
        for m in 1..=12u32 {
            let date = today.checked_sub_months(Months::new(m)).unwrap();
            insert(db, user, date, amount, kind, category, &format!("{}-{}", category, m));
        }
    }

    fn today() -> NaiveDate {
        // A Monday, which keeps week_start == today in assertions
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_empty_history_produces_flat_zero_forecast() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();
        db.set_cash_buffer(user, Some(0)).unwrap();

        let run = ForecastEngine::new(&db).generate_as_of(user, today()).unwrap();

        assert_eq!(run.current_cash, 0);
        assert_eq!(run.weeks.len(), 13);
        for week in &run.weeks {
            assert_eq!(week.projected, 0);
            assert_eq!(week.income, 0);
            assert_eq!(week.expenses, 0);
        }
        assert_eq!(run.alert, None);
        assert!(db.list_alerts(user, true).unwrap().is_empty());
    }

    #[test]
    fn test_running_cash_invariant_and_week_grid() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();
        seed_monthly(&db, user, today(), 100_000, TransactionKind::Income, "sales");
        seed_monthly(&db, user, today(), 50_000, TransactionKind::Expense, "rent");

        let run = ForecastEngine::new(&db).generate_as_of(user, today()).unwrap();

        assert_eq!(run.current_cash, 600_000);
        assert_eq!(run.weeks.len(), 13);

        // 100000*12/12/4.33 and 50000*12/12/4.33, rounded
        assert_eq!(run.weeks[0].income, 23_095);
        assert_eq!(run.weeks[0].expenses, 11_547);
        assert_eq!(run.weeks[0].projected, 600_000 + 23_095 - 11_547);

        for i in 1..13 {
            assert_eq!(
                run.weeks[i].projected,
                run.weeks[i - 1].projected + run.weeks[i].income - run.weeks[i].expenses
            );
        }

        // Weeks form a contiguous Monday-aligned grid starting this week
        assert_eq!(run.weeks[0].week_start, today());
        assert_eq!(run.weeks[0].week_label, "Week 1 (Mar 2)");
        for i in 1..13 {
            assert_eq!(run.weeks[i].week_start, run.weeks[i - 1].week_end);
        }
    }

    #[test]
    fn test_warning_on_first_violating_week() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();
        db.set_cash_buffer(user, Some(25_000)).unwrap();
        // Expenses only: cash starts negative of history sum and keeps falling,
        // so we seed income too and make week 4 the first week under buffer
        seed_monthly(&db, user, today(), 100_000, TransactionKind::Income, "sales");
        seed_monthly(&db, user, today(), 110_000, TransactionKind::Expense, "rent");

        // current cash = -120000; weekly delta = 23095 - 25404 = -2309 -> already
        // below buffer at week 1 and below zero, so critical
        let run = ForecastEngine::new(&db).generate_as_of(user, today()).unwrap();
        assert_eq!(run.alert, Some(AlertSeverity::Critical));

        let alerts = db.list_alerts(user, false).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Cash will run out");
        assert!(alerts[0].message.contains("Week 1 (Mar 2)"));
    }

    #[test]
    fn test_alert_scans_first_violation_only() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();
        let engine = ForecastEngine::new(&db);

        let monday = today();
        let weeks: Vec<WeekForecast> = (0..13)
            .map(|i| {
                let start = monday + Duration::weeks(i);
                // Weeks 1-3 healthy, week 4 dips below the buffer, later weeks worse
                let projected = match i {
                    0..=2 => 100_000,
                    3 => 20_000,
                    _ => -50_000,
                };
                WeekForecast {
                    week_start: start,
                    week_end: start + Duration::weeks(1),
                    week_label: format!("Week {} ({})", i + 1, start.format("%b %-d")),
                    projected,
                    income: 0,
                    expenses: 0,
                }
            })
            .collect();

        let user_row = db.get_user(user).unwrap();
        let user_row = User {
            cash_buffer: Some(25_000),
            ..user_row
        };
        let severity = engine.generate_alerts(&user_row, &weeks).unwrap();

        // Week 4 is >= 0, so warning even though later weeks go negative
        assert_eq!(severity, Some(AlertSeverity::Warning));
        let alerts = db.list_alerts(user, false).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Low cash warning");
        assert!(alerts[0].message.contains("Week 4"));
        assert!(alerts[0].message.contains("£200.00"));
        assert!(alerts[0].message.contains("£250.00"));
    }

    #[test]
    fn test_recovered_cash_clears_old_alerts() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();
        let engine = ForecastEngine::new(&db);

        // First run with no history and the default buffer: projected 0 < buffer
        let run = engine.generate_as_of(user, today()).unwrap();
        assert_eq!(run.alert, Some(AlertSeverity::Warning));
        assert_eq!(db.list_alerts(user, false).unwrap().len(), 1);

        // Healthy income arrives; rerun clears the stale alert
        seed_monthly(&db, user, today(), 1_000_000, TransactionKind::Income, "sales");
        let run = engine.generate_as_of(user, today()).unwrap();
        assert_eq!(run.alert, None);
        assert!(db.list_alerts(user, false).unwrap().is_empty());
    }

    #[test]
    fn test_rerun_is_idempotent_with_single_active() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();
        seed_monthly(&db, user, today(), 100_000, TransactionKind::Income, "sales");

        let engine = ForecastEngine::new(&db);
        let first = engine.generate_as_of(user, today()).unwrap();
        let second = engine.generate_as_of(user, today()).unwrap();

        assert_ne!(first.forecast_id, second.forecast_id);
        assert_eq!(first.weeks, second.weeks);
        assert_eq!(db.count_active_forecasts(user).unwrap(), 1);
        assert_eq!(
            db.find_active_forecast(user).unwrap().unwrap().id,
            second.forecast_id
        );
    }

    #[test]
    fn test_batch_isolates_per_user_failure() {
        let db = Database::in_memory().unwrap();
        let a = db.create_user("A").unwrap();
        let _b = db.create_user("B").unwrap();
        seed_monthly(&db, a, Utc::now().date_naive(), 100_000, TransactionKind::Income, "sales");

        let outcome = ForecastEngine::new(&db).generate_all().unwrap();
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 0);
    }
}
