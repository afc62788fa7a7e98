//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub transactions: i64,
    pub model_trained: bool,
    pub model_store: String,
}

/// GET /api/health - Liveness plus a summary of what is loaded
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    let transactions = state.db.count_transactions()?;
    let model_trained = match state.forecaster.model() {
        Ok(_) => true,
        Err(goalcast_core::Error::ModelNotFound(_)) => false,
        Err(e) => return Err(e.into()),
    };

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        transactions,
        model_trained,
        model_store: state.forecaster.store().name().to_string(),
    }))
}
