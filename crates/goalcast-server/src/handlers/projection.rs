//! Goal projection handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use goalcast_core::{ProjectionHorizon, ProjectionMode, ProjectionOutcome};

use crate::{AppError, AppState};

/// Request body for POST /api/goal-projection
///
/// Fields are optional so a missing amount is reported as a 400 with a
/// readable message instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjectionRequest {
    pub target_amount: Option<f64>,
    pub current_savings: Option<f64>,
    /// Projection start date (defaults to today)
    pub as_of: Option<NaiveDate>,
}

/// Projection response body
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProjectionResponse {
    #[serde(rename_all = "camelCase")]
    Projected {
        avg_monthly_savings: f64,
        months_needed: u32,
        projected_completion_date: String,
        horizon: ProjectionHorizon,
    },
    Achieved {
        achieved: bool,
        message: String,
    },
}

impl From<ProjectionOutcome> for ProjectionResponse {
    fn from(outcome: ProjectionOutcome) -> Self {
        match outcome {
            ProjectionOutcome::Projected(p) => Self::Projected {
                avg_monthly_savings: p.avg_monthly_rate,
                months_needed: p.months_needed,
                projected_completion_date: p.projected_completion_date.format("%Y-%m-%d").to_string(),
                horizon: p.horizon,
            },
            ProjectionOutcome::AlreadyAchieved => Self::Achieved {
                achieved: true,
                message: "Goal already achieved".to_string(),
            },
        }
    }
}

/// Run a serving-mode projection against the current model
pub(crate) fn run_projection(
    state: &AppState,
    target_amount: f64,
    current_savings: f64,
    as_of: Option<NaiveDate>,
) -> Result<ProjectionResponse, AppError> {
    let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
    let outcome = state.forecaster.project_goal(
        ProjectionMode::Serving {
            target_amount,
            current_savings,
        },
        as_of,
    )?;
    Ok(outcome.into())
}

/// POST /api/goal-projection - Project when a savings goal completes
pub async fn goal_projection(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ProjectionResponse>, AppError> {
    let req: GoalProjectionRequest = if body.is_empty() {
        GoalProjectionRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| AppError::bad_request("Invalid JSON"))?
    };

    let (Some(target_amount), Some(current_savings)) = (req.target_amount, req.current_savings)
    else {
        return Err(AppError::bad_request(
            "Missing values: targetAmount and currentSavings are required",
        ));
    };

    Ok(Json(run_projection(
        &state,
        target_amount,
        current_savings,
        req.as_of,
    )?))
}
