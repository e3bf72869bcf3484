//! Upcoming payment handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{core_error, AppError, AppState};
use runway_core::models::UpcomingPayment;

/// Response wrapper for upcoming payments
#[derive(Debug, Serialize)]
pub struct UpcomingResponse {
    pub payments: Vec<UpcomingPayment>,
}

/// GET /api/users/:id/upcoming-payments - Project recurring payments due
/// within the next four weeks
pub async fn upcoming_payments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UpcomingResponse>, AppError> {
    state.db.get_user(id).map_err(core_error)?;
    let payments = runway_core::upcoming_payments(&state.db, id).map_err(core_error)?;
    Ok(Json(UpcomingResponse { payments }))
}
