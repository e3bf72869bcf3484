//! 13-week cash-flow forecasting
//!
//! Pipeline: recurrence detection over historical transactions, a
//! stationary weekly projection, running-cash accumulation across 13
//! weeks, then alert generation against the user's safety buffer.

mod engine;
mod locks;
mod projection;
mod recurrence;
mod upcoming;

pub use engine::{BatchOutcome, ForecastConfig, ForecastEngine, ForecastRun};
pub use locks::UserLocks;
pub use projection::project_weekly;
pub use recurrence::{grouping_key, identify_recurring, KeyStrategy};
pub use upcoming::{project_upcoming, upcoming_payments, upcoming_payments_as_of, UpcomingConfig};
