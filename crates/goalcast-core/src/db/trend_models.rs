//! Trend model persistence
//!
//! Every save appends a row; the newest row is the active model and older rows
//! remain as training history.

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::model_store::ModelStore;
use crate::models::MonthIndex;
use crate::trend::TrendModel;

/// A trend model row with its storage ID
#[derive(Debug, Clone)]
pub struct StoredTrendModel {
    pub id: i64,
    pub model: TrendModel,
}

impl Database {
    /// Append a fitted model, returning its row ID
    pub fn save_trend_model(&self, model: &TrendModel) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO trend_models (slope, intercept, observations, first_month, last_month, trained_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                model.slope,
                model.intercept,
                model.observations as i64,
                model.first_month.map(i32::from),
                model.last_month.map(i32::from),
                model.trained_at.to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        info!(id, slope = model.slope, intercept = model.intercept, "Saved trend model");
        Ok(id)
    }

    /// The most recently saved model, if any
    pub fn latest_trend_model(&self) -> Result<Option<StoredTrendModel>> {
        let conn = self.conn()?;
        let model = conn
            .query_row(
                "SELECT id, slope, intercept, observations, first_month, last_month, trained_at
                 FROM trend_models ORDER BY id DESC LIMIT 1",
                [],
                |row| Self::row_to_trend_model(row),
            )
            .optional()?;

        Ok(model)
    }

    /// Training history, newest first
    pub fn list_trend_models(&self, limit: i64) -> Result<Vec<StoredTrendModel>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, slope, intercept, observations, first_month, last_month, trained_at
             FROM trend_models ORDER BY id DESC LIMIT ?",
        )?;

        let models = stmt
            .query_map(params![limit], |row| Self::row_to_trend_model(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(models)
    }

    fn row_to_trend_model(row: &rusqlite::Row) -> rusqlite::Result<StoredTrendModel> {
        let observations: i64 = row.get(3)?;
        let first_month: Option<i32> = row.get(4)?;
        let last_month: Option<i32> = row.get(5)?;
        let trained_at_str: String = row.get(6)?;
        Ok(StoredTrendModel {
            id: row.get(0)?,
            model: TrendModel {
                slope: row.get(1)?,
                intercept: row.get(2)?,
                observations: observations.max(0) as usize,
                first_month: first_month.and_then(|m| MonthIndex::try_from(m).ok()),
                last_month: last_month.and_then(|m| MonthIndex::try_from(m).ok()),
                trained_at: parse_datetime(&trained_at_str),
            },
        })
    }
}

impl ModelStore for Database {
    fn name(&self) -> &str {
        "database"
    }

    fn load(&self) -> Result<TrendModel> {
        self.latest_trend_model()?
            .map(|stored| stored.model)
            .ok_or_else(|| Error::ModelNotFound(format!("no trained model in {}", self.path())))
    }

    fn save(&self, model: &TrendModel) -> Result<()> {
        self.save_trend_model(model).map(|_| ())
    }
}
