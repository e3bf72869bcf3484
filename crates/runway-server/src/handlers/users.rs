//! User and settings handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{core_error, AppError, AppState, SuccessResponse};
use runway_core::models::User;

/// Request body for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

/// Request body for updating user settings
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    /// Safety buffer in minor units. Null resets to the default.
    pub cash_buffer: Option<i64>,
}

/// GET /api/users - List users
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.db.list_users()?;
    Ok(Json(users))
}

/// POST /api/users - Create a user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<User>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    let id = state.db.create_user(body.name.trim())?;
    let user = state.db.get_user(id)?;
    Ok(Json(user))
}

/// GET /api/users/:id - Get a user
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let user = state.db.get_user(id).map_err(core_error)?;
    Ok(Json(user))
}

/// PUT /api/users/:id/settings - Update a user's safety buffer
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<SettingsRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    if let Some(buffer) = body.cash_buffer {
        if buffer < 0 {
            return Err(AppError::bad_request("cash_buffer must be non-negative"));
        }
    }
    state
        .db
        .set_cash_buffer(id, body.cash_buffer)
        .map_err(core_error)?;
    Ok(Json(SuccessResponse { success: true }))
}
