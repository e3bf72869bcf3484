//! Forecast handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{core_error, AppError, AppState};
use runway_core::models::{Forecast, WeekForecast};
use runway_core::{BatchOutcome, ForecastEngine};

/// Response for a freshly generated forecast
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub forecast_id: i64,
    pub current_cash: i64,
    /// Lowest projected balance across the horizon
    pub lowest_projected: i64,
    pub weeks: Vec<WeekForecast>,
    /// Severity of the alert raised by this run, if any
    pub alert: Option<&'static str>,
}

/// GET /api/users/:id/forecast - Get the active forecast
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Forecast>, AppError> {
    state.db.get_user(id).map_err(core_error)?;
    let forecast = state
        .db
        .find_active_forecast(id)?
        .ok_or_else(|| AppError::not_found("No forecast generated yet"))?;
    Ok(Json(forecast))
}

/// POST /api/users/:id/forecast - Generate a fresh forecast
///
/// Runs under the shared per-user lock so a scheduled batch run racing
/// this request can't corrupt the single-active-forecast invariant.
pub async fn generate_forecast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ForecastResponse>, AppError> {
    let state = state.clone();
    let run = tokio::task::spawn_blocking(move || {
        ForecastEngine::new(&state.db)
            .with_locks(state.forecast_locks.clone())
            .generate(id)
    })
    .await
    .map_err(|e| anyhow::anyhow!("forecast task panicked: {}", e))?
    .map_err(core_error)?;

    let lowest_projected = run
        .weeks
        .iter()
        .map(|w| w.projected)
        .min()
        .unwrap_or(run.current_cash);

    Ok(Json(ForecastResponse {
        forecast_id: run.forecast_id,
        current_cash: run.current_cash,
        lowest_projected,
        weeks: run.weeks,
        alert: run.alert.map(|s| s.as_str()),
    }))
}

/// POST /api/forecast/run-all - Regenerate forecasts for every user
pub async fn run_all_forecasts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BatchOutcome>, AppError> {
    let state = state.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        ForecastEngine::new(&state.db)
            .with_locks(state.forecast_locks.clone())
            .generate_all()
    })
    .await
    .map_err(|e| anyhow::anyhow!("batch task panicked: {}", e))??;

    Ok(Json(outcome))
}
