//! Runway Core Library
//!
//! Shared functionality for the Runway cash-flow forecasting tool:
//! - Database access and migrations (encrypted SQLite)
//! - Recurring cash-flow pattern detection
//! - 13-week forecast generation with low-cash alerts
//! - Upcoming payment projection
//! - CSV transaction ingest

pub mod db;
pub mod error;
pub mod forecast;
pub mod import;
pub mod models;
pub mod money;

pub use db::{Database, TransactionInsertResult};
pub use error::{Error, Result};
pub use forecast::{
    identify_recurring, project_upcoming, project_weekly, upcoming_payments,
    upcoming_payments_as_of, BatchOutcome, ForecastConfig, ForecastEngine, ForecastRun,
    KeyStrategy, UserLocks,
};
pub use import::{ingest_csv, parse_csv, IngestSummary};
pub use models::{
    Alert, AlertSeverity, AlertType, Forecast, NewTransaction, RecurringItem, Transaction,
    TransactionKind, TransactionSource, UpcomingPayment, User, WeekForecast,
};
pub use money::{fmt_minor, parse_minor};
