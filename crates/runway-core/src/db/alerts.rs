//! Alert operations
//!
//! Each forecast run clears the user's undismissed alerts before writing
//! the new finding, so the alert list reflects the latest forecast only.
//! Dismissed alerts survive as history.

use std::str::FromStr;

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Alert, AlertSeverity, AlertType};

fn row_to_alert(row: &rusqlite::Row<'_>) -> rusqlite::Result<Alert> {
    let severity_str: String = row.get(3)?;
    Ok(Alert {
        id: row.get(0)?,
        user_id: row.get(1)?,
        // Only low_cash exists today, so the type column maps directly
        alert_type: AlertType::LowCash,
        severity: AlertSeverity::from_str(&severity_str).unwrap_or(AlertSeverity::Warning),
        title: row.get(4)?,
        message: row.get(5)?,
        dismissed: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

const ALERT_COLUMNS: &str = "id, user_id, type, severity, title, message, dismissed, created_at";

impl Database {
    /// Delete a user's undismissed alerts, returns how many were removed
    pub fn delete_undismissed_alerts(&self, user_id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM alerts WHERE user_id = ? AND dismissed = 0",
            params![user_id],
        )?;
        Ok(deleted)
    }

    /// Create an alert, returns the new alert ID
    pub fn create_alert(
        &self,
        user_id: i64,
        alert_type: AlertType,
        severity: AlertSeverity,
        title: &str,
        message: &str,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO alerts (user_id, type, severity, title, message) VALUES (?, ?, ?, ?, ?)",
            params![user_id, alert_type.as_str(), severity.as_str(), title, message],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's alerts, newest first
    pub fn list_alerts(&self, user_id: i64, include_dismissed: bool) -> Result<Vec<Alert>> {
        let conn = self.conn()?;
        let sql = if include_dismissed {
            format!(
                "SELECT {} FROM alerts WHERE user_id = ? ORDER BY created_at DESC, id DESC",
                ALERT_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM alerts WHERE user_id = ? AND dismissed = 0 \
                 ORDER BY created_at DESC, id DESC",
                ALERT_COLUMNS
            )
        };
        let mut stmt = conn.prepare(&sql)?;
        let alerts = stmt
            .query_map(params![user_id], row_to_alert)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(alerts)
    }

    /// Dismiss an alert
    pub fn dismiss_alert(&self, alert_id: i64) -> Result<()> {
        self.set_alert_dismissed(alert_id, true)
    }

    /// Restore a dismissed alert
    pub fn restore_alert(&self, alert_id: i64) -> Result<()> {
        self.set_alert_dismissed(alert_id, false)
    }

    fn set_alert_dismissed(&self, alert_id: i64, dismissed: bool) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE alerts SET dismissed = ? WHERE id = ?",
            params![dismissed, alert_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("alert {}", alert_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_lifecycle() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();

        let id = db
            .create_alert(
                user,
                AlertType::LowCash,
                AlertSeverity::Warning,
                "Low cash warning",
                "Projected cash in Week 4 (Mar 23): £1,200.00.",
            )
            .unwrap();

        let alerts = db.list_alerts(user, false).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);

        db.dismiss_alert(id).unwrap();
        assert!(db.list_alerts(user, false).unwrap().is_empty());
        assert_eq!(db.list_alerts(user, true).unwrap().len(), 1);

        db.restore_alert(id).unwrap();
        assert_eq!(db.list_alerts(user, false).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_undismissed_spares_dismissed() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();

        let old = db
            .create_alert(user, AlertType::LowCash, AlertSeverity::Critical, "Cash will run out", "old")
            .unwrap();
        db.dismiss_alert(old).unwrap();
        db.create_alert(user, AlertType::LowCash, AlertSeverity::Warning, "Low cash warning", "new")
            .unwrap();

        let deleted = db.delete_undismissed_alerts(user).unwrap();
        assert_eq!(deleted, 1);

        // Dismissed history survives
        let remaining = db.list_alerts(user, true).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, old);
    }

    #[test]
    fn test_dismiss_missing_alert() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(db.dismiss_alert(99), Err(Error::NotFound(_))));
    }
}
