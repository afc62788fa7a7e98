//! Goal completion arithmetic
//!
//! Given a target, the savings so far and a monthly savings rate, work out how
//! many months remain and when the goal completes. Evaluation order:
//!
//! 1. savings already at or above target: achieved, nothing else is computed
//! 2. rate zero or negative: rejected with [`Error::InsufficientRate`]
//! 3. raw months negative: achieved
//! 4. otherwise: projected, months rounded up, date offset by the raw months

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Goals reachable within this many months are short-term
pub const SHORT_TERM_MONTHS: u32 = 12;

/// How far away the projected completion is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionHorizon {
    ShortTerm,
    LongTerm,
}

impl ProjectionHorizon {
    pub fn from_months(months: u32) -> Self {
        if months > SHORT_TERM_MONTHS {
            Self::LongTerm
        } else {
            Self::ShortTerm
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }
}

impl std::fmt::Display for ProjectionHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A computed projection for a goal that is not yet met
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProjection {
    pub avg_monthly_rate: f64,
    /// Whole months remaining, always rounded up
    pub months_needed: u32,
    /// Unrounded months remaining, used for the completion date
    pub months_needed_raw: f64,
    pub projected_completion_date: NaiveDate,
    pub horizon: ProjectionHorizon,
}

/// Result of projecting a goal
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionOutcome {
    Projected(GoalProjection),
    AlreadyAchieved,
}

impl ProjectionOutcome {
    pub fn is_achieved(&self) -> bool {
        matches!(self, Self::AlreadyAchieved)
    }

    pub fn projection(&self) -> Option<&GoalProjection> {
        match self {
            Self::Projected(p) => Some(p),
            Self::AlreadyAchieved => None,
        }
    }
}

/// Project when `target_amount` is reached from `current_savings` at `avg_monthly_rate`
pub fn project(
    target_amount: f64,
    current_savings: f64,
    avg_monthly_rate: f64,
    as_of: NaiveDate,
) -> Result<ProjectionOutcome> {
    if !target_amount.is_finite() || !current_savings.is_finite() {
        return Err(Error::InvalidData(format!(
            "Target and current savings must be finite (target={}, current={})",
            target_amount, current_savings
        )));
    }

    if current_savings >= target_amount {
        debug!(target_amount, current_savings, "Goal already achieved");
        return Ok(ProjectionOutcome::AlreadyAchieved);
    }

    if !avg_monthly_rate.is_finite() || avg_monthly_rate <= 0.0 {
        warn!(avg_monthly_rate, "Rejecting projection with non-positive rate");
        return Err(Error::InsufficientRate(avg_monthly_rate));
    }

    let months_needed_raw = (target_amount - current_savings) / avg_monthly_rate;
    if months_needed_raw < 0.0 {
        return Ok(ProjectionOutcome::AlreadyAchieved);
    }

    let months_ceil = months_needed_raw.ceil();
    if months_ceil > u32::MAX as f64 {
        return Err(Error::InsufficientRate(avg_monthly_rate));
    }
    let months_needed = months_ceil as u32;

    // A rate this small pushes the date past what the calendar can represent
    let projected_completion_date = add_fractional_months(as_of, months_needed_raw)
        .ok_or(Error::InsufficientRate(avg_monthly_rate))?;

    let projection = GoalProjection {
        avg_monthly_rate,
        months_needed,
        months_needed_raw,
        projected_completion_date,
        horizon: ProjectionHorizon::from_months(months_needed),
    };

    debug!(
        months_needed,
        months_needed_raw,
        completion = %projected_completion_date,
        "Projected goal completion"
    );

    Ok(ProjectionOutcome::Projected(projection))
}

/// Offset a date by a fractional number of months
///
/// Whole months use calendar month addition (day clamped to month end); the
/// fractional remainder is that share of the days in the following month.
pub fn add_fractional_months(date: NaiveDate, months: f64) -> Option<NaiveDate> {
    if !months.is_finite() || months < 0.0 || months > u32::MAX as f64 {
        return None;
    }

    let whole = months.trunc();
    let base = date.checked_add_months(Months::new(whole as u32))?;

    let fraction = months - whole;
    if fraction == 0.0 {
        return Some(base);
    }

    let next = base.checked_add_months(Months::new(1))?;
    let days_in_span = (next - base).num_days();
    let offset = (fraction * days_in_span as f64).round() as i64;
    base.checked_add_signed(Duration::days(offset))
}
