//! Forecasting command implementations (train, forecast, project, model)

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use goalcast_core::{
    config::{Config, StoreKind},
    db::{Database, StoredTrendModel},
    forecaster::{GoalForecaster, ProjectionMode},
    model_store::ModelStore,
    projection::ProjectionOutcome,
    source::{JsonTransactionSource, TransactionSource},
};

/// Build the forecaster from the configured model store and a transaction source
pub fn forecaster(db: &Database, config: &Config, from_json: Option<&Path>) -> Result<GoalForecaster> {
    let source: Arc<dyn TransactionSource> = match from_json {
        Some(path) => Arc::new(
            JsonTransactionSource::from_path(path)
                .with_context(|| format!("Failed to read transactions from {}", path.display()))?,
        ),
        None => Arc::new(db.clone()),
    };
    Ok(GoalForecaster::new(source, config.model.open_store(db)))
}

pub fn cmd_train(db: &Database, config: &Config) -> Result<()> {
    println!("📈 Training savings trend model...");

    let forecaster = forecaster(db, config, None)?;
    let model = forecaster.train().context("Training failed")?;

    println!("✅ Model trained ({} store)", forecaster.store().name());
    println!("   Months of data: {}", model.observations);
    if let (Some(first), Some(last)) = (model.first_month, model.last_month) {
        println!("   Window: {} → {}", first, last);
    }
    println!("   Slope: {:.4} per month index", model.slope);
    println!("   Intercept: {:.2}", model.intercept);

    Ok(())
}

pub fn cmd_forecast(
    db: &Database,
    config: &Config,
    months: Option<usize>,
    output: Option<&Path>,
    from_json: Option<&Path>,
) -> Result<()> {
    let months = months.unwrap_or(config.forecast.horizon_months);
    if months == 0 {
        anyhow::bail!("--months must be at least 1");
    }
    let output = output.unwrap_or(&config.forecast.output_path);

    let forecaster = forecaster(db, config, from_json)?;
    let forecast = forecaster.forecast(months)?;

    println!();
    println!("🔮 Predicted Savings for Next {} Months", months);
    println!("   ─────────────────────────────");
    for (month, amount) in forecast.to_document() {
        println!("   Month {}: ${:.2}", month, amount);
    }

    forecast
        .write_document(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!();
    println!("✅ Predictions saved in {}", output.display());

    Ok(())
}

pub fn cmd_project(
    db: &Database,
    config: &Config,
    target: Option<f64>,
    current: Option<f64>,
    as_of: NaiveDate,
    from_json: Option<&Path>,
) -> Result<()> {
    let target_amount = target.unwrap_or(config.goal.default_target);
    let mode = match current {
        Some(current_savings) => ProjectionMode::Serving {
            target_amount,
            current_savings,
        },
        None => ProjectionMode::Batch { target_amount },
    };

    let forecaster = forecaster(db, config, from_json)?;
    let outcome = forecaster.project_goal(mode, as_of)?;

    print_outcome(target_amount, &outcome);
    Ok(())
}

/// Print a projection result
pub fn print_outcome(target_amount: f64, outcome: &ProjectionOutcome) {
    println!();
    match outcome {
        ProjectionOutcome::AlreadyAchieved => {
            println!("🎉 Goal already achieved (target ${:.2})", target_amount);
        }
        ProjectionOutcome::Projected(p) => {
            println!("🎯 Goal Projection (target ${:.2})", target_amount);
            println!("   ─────────────────────────────");
            println!("   Predicted monthly savings: ${:.2}", p.avg_monthly_rate);
            println!("   Months needed: {}", p.months_needed);
            println!(
                "   Projected completion: {}",
                p.projected_completion_date.format("%a %b %d %Y")
            );
            println!("   Horizon: {}", p.horizon);
        }
    }
}

/// Previous fits behind the active model, newest first
///
/// Only the database store keeps history; a file store has just its artifact.
pub fn training_history(db: &Database, config: &Config, limit: i64) -> Result<Vec<StoredTrendModel>> {
    match config.model.store {
        StoreKind::Database => Ok(db.list_trend_models(limit.max(1))?),
        StoreKind::File => Ok(Vec::new()),
    }
}

pub fn cmd_model(db: &Database, config: &Config, history: i64) -> Result<()> {
    let forecaster = forecaster(db, config, None)?;

    let model = match forecaster.model() {
        Ok(model) => model,
        Err(goalcast_core::Error::ModelNotFound(_)) => {
            println!("No trained model yet. Train one with:");
            println!("  goalcast train");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    println!("📐 Active Trend Model ({} store)", forecaster.store().name());
    println!("   ─────────────────────────────");
    println!("   Trained: {}", model.trained_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("   Months of data: {}", model.observations);
    println!("   Slope: {:.4}", model.slope);
    println!("   Intercept: {:.2}", model.intercept);

    let (next, rate) = forecaster.monthly_rate()?;
    println!("   Next month ({}): ${:.2}", next, rate);

    let fits = training_history(db, config, history)?;
    if fits.len() > 1 {
        println!();
        println!("   History:");
        for fit in fits {
            println!(
                "   [{}] {} │ slope {:>10.4} │ {} months",
                fit.id,
                fit.model.trained_at.format("%Y-%m-%d %H:%M"),
                fit.model.slope,
                fit.model.observations
            );
        }
    }

    Ok(())
}
