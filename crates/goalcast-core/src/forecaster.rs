//! Goal forecasting façade
//!
//! `GoalForecaster` is the only component that touches the transaction source
//! and the model store. Everything it calls into (aggregation, trend fit,
//! projection) is pure.
//!
//! Two run modes share one pipeline:
//! - serving: the caller supplies target and current savings
//! - batch: current savings is the sum of every transaction, target comes from
//!   configuration
//!
//! The monthly rate in both modes is the trend's prediction for the calendar
//! month after the latest month with transactions.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::error::{Error, Result};
use crate::model_store::ModelStore;
use crate::models::{MonthIndex, MonthlyAggregate};
use crate::projection::{project, ProjectionOutcome};
use crate::source::TransactionSource;
use crate::trend::TrendModel;

/// How current savings and target are obtained for a projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    /// Request-driven: both amounts come from the caller
    Serving {
        target_amount: f64,
        current_savings: f64,
    },
    /// Report-driven: current savings is the transaction total
    Batch { target_amount: f64 },
}

/// Predicted total for one future month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyForecast {
    pub month_index: MonthIndex,
    pub predicted_amount: f64,
}

/// Batch forecast over the months following the latest data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub latest_month: MonthIndex,
    pub months: Vec<MonthlyForecast>,
}

impl Forecast {
    /// The `{ "<month_index>": amount }` document, amounts rounded to cents
    pub fn to_document(&self) -> BTreeMap<String, f64> {
        self.months
            .iter()
            .map(|m| (m.month_index.to_string(), round_cents(m.predicted_amount)))
            .collect()
    }

    /// Write the forecast document as JSON
    pub fn write_document(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.to_document())?;
        fs::write(path, content)?;
        info!(path = %path.display(), months = self.months.len(), "Wrote forecast document");
        Ok(())
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Orchestrates aggregation, the trend model and the goal projector
#[derive(Clone)]
pub struct GoalForecaster {
    source: Arc<dyn TransactionSource>,
    store: Arc<dyn ModelStore>,
}

impl GoalForecaster {
    pub fn new(source: Arc<dyn TransactionSource>, store: Arc<dyn ModelStore>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<dyn ModelStore> {
        &self.store
    }

    /// Current monthly series from the transaction source
    pub fn monthly_series(&self) -> Result<Vec<MonthlyAggregate>> {
        let records = self.source.fetch_transactions()?;
        let series = aggregate(&records)?;
        debug!(
            records = records.len(),
            months = series.len(),
            "Aggregated transactions"
        );
        Ok(series)
    }

    /// Fit a model on every transaction and persist it
    pub fn train(&self) -> Result<TrendModel> {
        let series = self.monthly_series()?;
        let model = TrendModel::fit(&series)?;
        self.store.save(&model)?;

        info!(
            store = self.store.name(),
            observations = model.observations,
            slope = model.slope,
            intercept = model.intercept,
            "Trained trend model"
        );
        Ok(model)
    }

    /// Load the persisted model
    pub fn model(&self) -> Result<TrendModel> {
        self.store.load()
    }

    /// Predictions for the `months` calendar months after the latest data
    pub fn forecast(&self, months: usize) -> Result<Forecast> {
        let model = self.store.load()?;
        let latest_month = self.latest_month(&model)?;

        let months = model
            .predict_range(latest_month, months)
            .into_iter()
            .map(|(month_index, predicted_amount)| MonthlyForecast {
                month_index,
                predicted_amount,
            })
            .collect();

        Ok(Forecast {
            latest_month,
            months,
        })
    }

    /// Predicted savings for the month after the latest data
    pub fn monthly_rate(&self) -> Result<(MonthIndex, f64)> {
        let model = self.store.load()?;
        let month = self.latest_month(&model)?.next();
        Ok((month, model.predict(month)))
    }

    /// Project a goal using the persisted model
    pub fn project_goal(&self, mode: ProjectionMode, as_of: NaiveDate) -> Result<ProjectionOutcome> {
        let (target_amount, current_savings) = match mode {
            ProjectionMode::Serving {
                target_amount,
                current_savings,
            } => (target_amount, current_savings),
            ProjectionMode::Batch { target_amount } => {
                (target_amount, self.source.total_savings()?)
            }
        };

        // Achievement does not depend on the model, so it is settled before loading one
        if current_savings >= target_amount {
            return project(target_amount, current_savings, 0.0, as_of);
        }

        let (month, rate) = self.monthly_rate()?;
        debug!(%month, rate, target_amount, current_savings, "Projecting goal");
        project(target_amount, current_savings, rate, as_of)
    }

    /// Latest month with transactions, falling back to the model's training window
    fn latest_month(&self, model: &TrendModel) -> Result<MonthIndex> {
        let records = self.source.fetch_transactions()?;
        if records.is_empty() {
            return model.last_month.ok_or(Error::EmptyInput);
        }

        aggregate(&records)?
            .last()
            .map(|m| m.month_index)
            .ok_or(Error::EmptyInput)
    }
}
