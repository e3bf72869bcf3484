//! Background scheduler for periodic forecast regeneration
//!
//! Optional, enabled via environment variables:
//!
//! - `RUNWAY_FORECAST_SCHEDULE`: Interval in hours (e.g., "24" for daily)
//!
//! Each tick regenerates every user's forecast sequentially with per-user
//! failure isolation, same as the `/api/forecast/run-all` endpoint.

use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info, warn};

use runway_core::{Database, ForecastEngine, UserLocks};

/// Configuration for scheduled forecast runs
#[derive(Debug, Clone)]
pub struct ForecastScheduleConfig {
    /// Interval between batch runs in hours
    pub interval_hours: u64,
}

impl ForecastScheduleConfig {
    /// Parse configuration from environment variables
    ///
    /// Returns None if scheduling is not configured (RUNWAY_FORECAST_SCHEDULE not set)
    pub fn from_env() -> Option<Self> {
        let interval_hours: u64 = std::env::var("RUNWAY_FORECAST_SCHEDULE")
            .ok()
            .and_then(|s| s.parse().ok())?;

        if interval_hours == 0 {
            warn!("RUNWAY_FORECAST_SCHEDULE is 0, scheduled forecasts disabled");
            return None;
        }

        Some(Self { interval_hours })
    }
}

/// Start the forecast scheduler as a background task
///
/// Shares the per-user lock registry with request handlers so a scheduled
/// run never races a manual regeneration for the same user.
pub fn start_forecast_scheduler(db: Database, locks: UserLocks, config: ForecastScheduleConfig) {
    info!(
        "Starting forecast scheduler: every {} hours",
        config.interval_hours
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_hours * 3600));

        // Skip the first immediate tick - handlers cover on-demand generation
        ticker.tick().await;

        loop {
            ticker.tick().await;

            info!("Running scheduled forecast batch...");

            let db = db.clone();
            let locks = locks.clone();
            let result = tokio::task::spawn_blocking(move || {
                ForecastEngine::new(&db).with_locks(locks).generate_all()
            })
            .await;

            match result {
                Ok(Ok(outcome)) => {
                    info!(
                        succeeded = outcome.succeeded,
                        failed = outcome.failed,
                        "Scheduled forecast batch completed"
                    );
                }
                Ok(Err(e)) => {
                    error!("Scheduled forecast batch failed: {}", e);
                }
                Err(e) => {
                    error!("Scheduled forecast task panicked: {}", e);
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_not_set() {
        std::env::remove_var("RUNWAY_FORECAST_SCHEDULE");
        assert!(ForecastScheduleConfig::from_env().is_none());
    }

    #[test]
    fn test_config_from_env_zero() {
        std::env::set_var("RUNWAY_FORECAST_SCHEDULE", "0");
        assert!(ForecastScheduleConfig::from_env().is_none());
        std::env::remove_var("RUNWAY_FORECAST_SCHEDULE");
    }
}
