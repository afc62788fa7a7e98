//! Trend model and forecast handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use goalcast_core::{MonthIndex, TrendModel};

use crate::{AppError, AppState, MAX_FORECAST_MONTHS};

/// Query parameters for GET /api/forecast
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Months to forecast (defaults to the configured horizon)
    pub months: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub latest_month: MonthIndex,
    /// Month index → predicted total, rounded to cents
    pub predictions: BTreeMap<String, f64>,
}

/// GET /api/forecast - Predicted totals for the months after the latest data
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, AppError> {
    let months = params
        .months
        .unwrap_or(state.settings.forecast.horizon_months);
    if months == 0 || months > MAX_FORECAST_MONTHS {
        return Err(AppError::bad_request(&format!(
            "months must be between 1 and {}",
            MAX_FORECAST_MONTHS
        )));
    }

    let forecast = state.forecaster.forecast(months)?;

    Ok(Json(ForecastResponse {
        latest_month: forecast.latest_month,
        predictions: forecast.to_document(),
    }))
}

/// POST /api/train - Fit a new trend model on all stored transactions
pub async fn train_model(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TrendModel>, AppError> {
    let model = state.forecaster.train()?;
    info!(
        store = state.forecaster.store().name(),
        observations = model.observations,
        "Model retrained via API"
    );
    Ok(Json(model))
}

/// GET /api/model - The currently active trend model
pub async fn get_model(State(state): State<Arc<AppState>>) -> Result<Json<TrendModel>, AppError> {
    Ok(Json(state.forecaster.model()?))
}
