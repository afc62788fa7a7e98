//! Goalcast Core Library
//!
//! Savings-goal forecasting from transaction history:
//! - Monthly aggregation of raw transaction records
//! - Linear trend fit over the month index
//! - Goal projection (months remaining, completion date)
//! - Database access, migrations and CSV import
//! - Pluggable transaction sources and model stores

pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod forecaster;
pub mod import;
pub mod model_store;
pub mod models;
pub mod projection;
pub mod source;
pub mod trend;

pub use aggregate::{aggregate, aggregate_transactions};
pub use config::Config;
pub use db::{Database, StoredTrendModel, TransactionInsertResult};
pub use error::{Error, Result};
pub use forecaster::{Forecast, GoalForecaster, MonthlyForecast, ProjectionMode};
pub use model_store::{FileModelStore, ModelStore};
pub use models::{MonthIndex, MonthlyAggregate, RawTransaction, Transaction};
pub use projection::{project, GoalProjection, ProjectionHorizon, ProjectionOutcome};
pub use source::{JsonTransactionSource, TransactionSource};
pub use trend::TrendModel;
