//! Domain models for Runway
//!
//! All monetary values are integers in minor currency units (pence).
//! Transaction amounts are always non-negative; the cash-flow direction
//! comes from [`TransactionKind`], never from the sign of the amount.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A connected business owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Cash safety buffer in minor units. None means "use the default".
    pub cash_buffer: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Direction of a transaction's cash impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction source - how it was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    /// Pushed by an external accounting sync collaborator
    #[default]
    Sync,
    /// Imported from a CSV export
    Csv,
    /// Manually entered
    Manual,
}

impl TransactionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Csv => "csv",
            Self::Manual => "manual",
        }
    }
}

impl std::str::FromStr for TransactionSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sync" => Ok(Self::Sync),
            "csv" => Ok(Self::Csv),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown transaction source: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial transaction owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub description: String,
    /// Always non-negative; direction comes from `kind`
    pub amount: i64,
    pub kind: TransactionKind,
    pub category: Option<String>,
    /// Counterparty (customer or supplier) name from the accounting system
    pub contact: Option<String>,
    pub source: TransactionSource,
    /// Hash for deduplication across repeated syncs
    pub import_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A new transaction to be stored (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: i64,
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub contact: Option<String>,
    #[serde(default)]
    pub source: TransactionSource,
    pub import_hash: String,
}

/// A detected recurring cash-flow pattern
///
/// Computed fresh on every forecast run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurringItem {
    /// Grouping key: category, else contact, else a caller-chosen fallback
    pub key: String,
    /// Rounded mean of the group's amounts, in minor units
    pub avg_amount: i64,
    /// Number of occurrences inside the lookback window (always >= 3)
    pub occurrences: u32,
    pub kind: TransactionKind,
}

/// One week of a 13-week forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekForecast {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    /// e.g. "Week 4 (Mar 23)"
    pub week_label: String,
    /// Running cash at the end of this week
    pub projected: i64,
    pub income: i64,
    pub expenses: i64,
}

/// A persisted 13-week forecast
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub id: i64,
    pub user_id: i64,
    pub weeks: Vec<WeekForecast>,
    pub generated_at: DateTime<Utc>,
    /// At most one active forecast exists per user
    pub is_active: bool,
}

/// Alert categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowCash,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowCash => "low_cash",
        }
    }
}

/// Alert severity, derived from the sign of the violating week's cash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
        }
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "warning" => Ok(Self::Warning),
            _ => Err(format!("Unknown alert severity: {}", s)),
        }
    }
}

/// A low-cash alert raised by a forecast run
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: i64,
    pub user_id: i64,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub dismissed: bool,
    pub created_at: DateTime<Utc>,
}

/// A projected upcoming recurring payment (computed on demand, never stored)
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingPayment {
    pub description: String,
    /// Rounded mean of the group's amounts, in minor units
    pub amount: i64,
    /// The grouping key the pattern was detected under
    pub category: String,
    pub projected_date: NaiveDate,
    /// Coarse label: "Tomorrow", "In N days", "Next week", ...
    pub due_label: String,
    pub days_until: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_kind_round_trip() {
        assert_eq!(TransactionKind::Income.as_str(), "income");
        assert_eq!(
            TransactionKind::from_str("expense").unwrap(),
            TransactionKind::Expense
        );
        assert!(TransactionKind::from_str("transfer").is_err());
    }

    #[test]
    fn test_alert_severity_round_trip() {
        assert_eq!(AlertSeverity::Critical.as_str(), "critical");
        assert_eq!(
            AlertSeverity::from_str("warning").unwrap(),
            AlertSeverity::Warning
        );
    }

    #[test]
    fn test_week_forecast_json_round_trip() {
        let week = WeekForecast {
            week_start: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            week_end: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            week_label: "Week 1 (Mar 2)".to_string(),
            projected: 123_456,
            income: 23_095,
            expenses: 11_547,
        };

        let json = serde_json::to_string(&week).unwrap();
        let back: WeekForecast = serde_json::from_str(&json).unwrap();
        assert_eq!(back, week);
    }
}
