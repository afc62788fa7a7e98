//! Transaction handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use goalcast_core::import::manual_transaction;
use goalcast_core::models::{StoredTransaction, TransactionKind};

use crate::{AppError, AppState, MAX_PAGE_LIMIT};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transactions: Vec<StoredTransaction>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Request body for creating a transaction
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub date: NaiveDate,
    pub amount: f64,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Income or Expense
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionResponse>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let transactions = state.db.list_transactions(limit, offset)?;
    let total = state.db.count_transactions()?;

    Ok(Json(TransactionResponse {
        transactions,
        total,
        limit,
        offset,
    }))
}

/// POST /api/transactions - Record a transaction by hand
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<StoredTransaction>), AppError> {
    let req: CreateTransactionRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))?;

    let kind = req
        .kind
        .as_deref()
        .map(str::parse::<TransactionKind>)
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let tx = manual_transaction(req.date, req.amount, req.description, req.category, kind)?;
    let id = state.db.insert_transaction(&tx)?.id();

    let stored = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::internal("Transaction missing after insert"))?;

    Ok((StatusCode::CREATED, Json(stored)))
}
