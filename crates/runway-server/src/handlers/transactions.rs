//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{core_error, AppError, AppState, MAX_PAGE_LIMIT};
use runway_core::models::{NewTransaction, Transaction};
use runway_core::{ingest_csv, IngestSummary, TransactionInsertResult};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

/// Result of pushing a batch of transactions
#[derive(Debug, Serialize)]
pub struct PushResult {
    pub inserted: usize,
    pub duplicates: usize,
}

/// GET /api/users/:id/transactions - List recent transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    if params.limit < 1 || params.limit > MAX_PAGE_LIMIT {
        return Err(AppError::bad_request(&format!(
            "limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }
    if params.offset < 0 {
        return Err(AppError::bad_request("offset must be non-negative"));
    }

    // Ensure the user exists so unknown IDs 404 instead of returning []
    state.db.get_user(id).map_err(core_error)?;
    let transactions = state.db.list_transactions(id, params.limit, params.offset)?;
    Ok(Json(transactions))
}

/// POST /api/users/:id/transactions - Accept a sync batch
///
/// Used by external accounting sync collaborators. Rows carry their own
/// import hashes; duplicates are counted, never errored.
pub async fn push_transactions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(batch): Json<Vec<NewTransaction>>,
) -> Result<Json<PushResult>, AppError> {
    state.db.get_user(id).map_err(core_error)?;

    let mut result = PushResult {
        inserted: 0,
        duplicates: 0,
    };
    for tx in &batch {
        match state.db.insert_transaction(id, tx).map_err(core_error)? {
            TransactionInsertResult::Inserted(_) => result.inserted += 1,
            TransactionInsertResult::Duplicate(_) => result.duplicates += 1,
        }
    }
    Ok(Json(result))
}

/// POST /api/users/:id/import - Ingest a CSV export (request body is the file)
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: String,
) -> Result<Json<IngestSummary>, AppError> {
    state.db.get_user(id).map_err(core_error)?;
    let summary = ingest_csv(&state.db, id, body.as_bytes()).map_err(core_error)?;
    Ok(Json(summary))
}
