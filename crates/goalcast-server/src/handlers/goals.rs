//! Savings goal handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use goalcast_core::models::{Goal, NewGoal};

use super::projection::{run_projection, ProjectionResponse};
use crate::{AppError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjectionQuery {
    pub as_of: Option<NaiveDate>,
}

/// GET /api/goals - List saved goals
pub async fn list_goals(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Goal>>, AppError> {
    Ok(Json(state.db.list_goals()?))
}

/// POST /api/goals - Save a new goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let req: NewGoal = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))?;

    let id = state.db.create_goal(&req)?;
    let goal = state
        .db
        .get_goal(id)?
        .ok_or_else(|| AppError::internal("Goal missing after insert"))?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET /api/goals/:id - Get a goal
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Goal>, AppError> {
    state
        .db
        .get_goal(id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Goal not found"))
}

/// DELETE /api/goals/:id - Delete a goal
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_goal(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/goals/:id/projection - Project a saved goal
pub async fn get_goal_projection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<GoalProjectionQuery>,
) -> Result<Json<ProjectionResponse>, AppError> {
    let goal = state
        .db
        .get_goal(id)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;

    Ok(Json(run_projection(
        &state,
        goal.target_amount,
        goal.current_savings,
        params.as_of,
    )?))
}
