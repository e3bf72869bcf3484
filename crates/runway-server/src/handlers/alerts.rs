//! Alert handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{core_error, AppError, AppState, SuccessResponse};
use runway_core::models::Alert;

/// Query parameters for listing alerts
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub include_dismissed: bool,
}

/// GET /api/users/:id/alerts - List alerts
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<AlertQuery>,
) -> Result<Json<Vec<Alert>>, AppError> {
    state.db.get_user(id).map_err(core_error)?;
    let alerts = state.db.list_alerts(id, params.include_dismissed)?;
    Ok(Json(alerts))
}

/// POST /api/alerts/:id/dismiss - Dismiss an alert
pub async fn dismiss_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.dismiss_alert(id).map_err(core_error)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/alerts/:id/restore - Restore (undismiss) an alert
pub async fn restore_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.restore_alert(id).map_err(core_error)?;
    Ok(Json(SuccessResponse { success: true }))
}
