//! Forecast persistence
//!
//! A user has at most one active forecast. Replacing it deactivates the
//! old rows and inserts the new one inside a single transaction, so a
//! concurrent reader never sees zero or two active forecasts.

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Forecast, WeekForecast};

fn row_to_forecast(row: &rusqlite::Row<'_>) -> rusqlite::Result<Forecast> {
    let weeks_json: String = row.get(2)?;
    let weeks: Vec<WeekForecast> = serde_json::from_str(&weeks_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Forecast {
        id: row.get(0)?,
        user_id: row.get(1)?,
        weeks,
        generated_at: parse_datetime(&row.get::<_, String>(3)?),
        is_active: row.get(4)?,
    })
}

impl Database {
    /// Replace a user's active forecast atomically, returns the new forecast ID
    pub fn replace_active_forecast(&self, user_id: i64, weeks: &[WeekForecast]) -> Result<i64> {
        let weeks_json = serde_json::to_string(weeks)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE forecasts SET is_active = 0 WHERE user_id = ? AND is_active = 1",
            params![user_id],
        )?;
        tx.execute(
            "INSERT INTO forecasts (user_id, weeks, is_active) VALUES (?, ?, 1)",
            params![user_id, weeks_json],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    /// Get a user's active forecast, if one exists
    pub fn find_active_forecast(&self, user_id: i64) -> Result<Option<Forecast>> {
        let conn = self.conn()?;
        let forecast = conn
            .query_row(
                "SELECT id, user_id, weeks, generated_at, is_active FROM forecasts \
                 WHERE user_id = ? AND is_active = 1 ORDER BY id DESC LIMIT 1",
                params![user_id],
                row_to_forecast,
            )
            .optional()?;
        Ok(forecast)
    }

    /// Count a user's active forecasts (used by invariant tests)
    pub fn count_active_forecasts(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM forecasts WHERE user_id = ? AND is_active = 1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn week(n: u32, projected: i64) -> WeekForecast {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap() + chrono::Duration::weeks((n - 1) as i64);
        WeekForecast {
            week_start: start,
            week_end: start + chrono::Duration::weeks(1),
            week_label: format!("Week {} ({})", n, start.format("%b %-d")),
            projected,
            income: 0,
            expenses: 0,
        }
    }

    #[test]
    fn test_replace_keeps_single_active() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();

        let first = db.replace_active_forecast(user, &[week(1, 100)]).unwrap();
        let second = db.replace_active_forecast(user, &[week(1, 200)]).unwrap();
        assert_ne!(first, second);

        assert_eq!(db.count_active_forecasts(user).unwrap(), 1);
        let active = db.find_active_forecast(user).unwrap().unwrap();
        assert_eq!(active.id, second);
        assert_eq!(active.weeks[0].projected, 200);
    }

    #[test]
    fn test_weeks_round_trip_through_json_column() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();

        let weeks: Vec<WeekForecast> = (1..=13).map(|n| week(n, n as i64 * 1000)).collect();
        db.replace_active_forecast(user, &weeks).unwrap();

        let active = db.find_active_forecast(user).unwrap().unwrap();
        assert_eq!(active.weeks, weeks);
        assert!(active.is_active);
    }

    #[test]
    fn test_no_active_forecast() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();
        assert!(db.find_active_forecast(user).unwrap().is_none());
    }
}
