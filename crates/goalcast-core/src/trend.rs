//! Linear trend of monthly totals over the month index
//!
//! Fits `total = slope * month_index + intercept` with ordinary least squares.
//!
//! Month indices are ~6-digit numbers (`202401`), so the sums of squares in the
//! textbook formula lose most of their significant digits. The fit runs on the
//! index centred on its mean and converts back, keeping the public coefficients
//! in raw month-index units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{MonthIndex, MonthlyAggregate};

/// A fitted trend model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    /// Change in monthly total per unit of month index
    pub slope: f64,
    /// Monthly total at month index 0
    pub intercept: f64,
    /// Number of monthly aggregates used in the fit
    pub observations: usize,
    pub first_month: Option<MonthIndex>,
    pub last_month: Option<MonthIndex>,
    pub trained_at: DateTime<Utc>,
}

impl TrendModel {
    /// Build a model from known coefficients
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self {
            slope,
            intercept,
            observations: 0,
            first_month: None,
            last_month: None,
            trained_at: Utc::now(),
        }
    }

    /// Fit a least-squares line through `(month_index, total_amount)`
    ///
    /// A series with a single distinct month index yields slope 0 and the mean
    /// total as intercept, so a forecast is still available.
    pub fn fit(series: &[MonthlyAggregate]) -> Result<Self> {
        if series.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = series.len() as f64;
        let mean_x = series.iter().map(|m| m.month_index.as_f64()).sum::<f64>() / n;
        let mean_y = series.iter().map(|m| m.total_amount).sum::<f64>() / n;

        let (sxx, sxy) = series.iter().fold((0.0, 0.0), |(sxx, sxy), m| {
            let dx = m.month_index.as_f64() - mean_x;
            let dy = m.total_amount - mean_y;
            (sxx + dx * dx, sxy + dx * dy)
        });

        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        let intercept = mean_y - slope * mean_x;

        let model = Self {
            slope,
            intercept,
            observations: series.len(),
            first_month: series.iter().map(|m| m.month_index).min(),
            last_month: series.iter().map(|m| m.month_index).max(),
            trained_at: Utc::now(),
        };

        debug!(
            slope = model.slope,
            intercept = model.intercept,
            observations = model.observations,
            "Fitted trend model"
        );

        Ok(model)
    }

    /// Predicted monthly total for a month
    pub fn predict(&self, month_index: MonthIndex) -> f64 {
        self.predict_at(month_index.as_f64())
    }

    /// Predicted value at an arbitrary point on the month-index axis
    pub fn predict_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predictions for the `months` calendar months following `after`
    pub fn predict_range(&self, after: MonthIndex, months: usize) -> Vec<(MonthIndex, f64)> {
        let mut out = Vec::with_capacity(months);
        let mut month = after;
        for _ in 0..months {
            month = month.next();
            out.push((month, self.predict(month)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(index: i32, total: f64) -> MonthlyAggregate {
        MonthlyAggregate {
            month_index: MonthIndex::try_from(index).unwrap(),
            total_amount: total,
        }
    }

    #[test]
    fn test_fit_perfect_line() {
        let series = vec![point(1, 10.0), point(2, 20.0), point(3, 30.0)];
        let model = TrendModel::fit(&series).unwrap();

        assert!((model.slope - 10.0).abs() < 1e-9);
        assert!(model.intercept.abs() < 1e-9);
        assert!((model.predict(MonthIndex::try_from(4).unwrap()) - 40.0).abs() < 1e-6);
        assert_eq!(model.observations, 3);
    }

    #[test]
    fn test_fit_single_point_is_flat() {
        let model = TrendModel::fit(&[point(5, 100.0)]).unwrap();

        assert_eq!(model.slope, 0.0);
        assert_eq!(model.intercept, 100.0);
        assert_eq!(model.predict(MonthIndex::try_from(202401).unwrap()), 100.0);
        assert_eq!(model.predict_at(-7.0), 100.0);
    }

    #[test]
    fn test_fit_empty_series() {
        assert!(matches!(TrendModel::fit(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_fit_large_month_indices_keeps_precision() {
        // Linear in the raw index: total = 3 * index - 600_000
        let series: Vec<MonthlyAggregate> = (202401..=202409)
            .map(|i| point(i, 3.0 * i as f64 - 600_000.0))
            .collect();
        let model = TrendModel::fit(&series).unwrap();

        assert!((model.slope - 3.0).abs() < 1e-9);
        let next = MonthIndex::try_from(202410).unwrap();
        assert!((model.predict(next) - (3.0 * 202410.0 - 600_000.0)).abs() < 1e-6);
        assert_eq!(model.first_month.unwrap().value(), 202401);
        assert_eq!(model.last_month.unwrap().value(), 202409);
    }

    #[test]
    fn test_fit_noisy_series_matches_closed_form() {
        let series = vec![
            point(202401, 1200.0),
            point(202402, 900.0),
            point(202403, 1500.0),
            point(202404, 1300.0),
        ];
        let model = TrendModel::fit(&series).unwrap();

        // x centred: -1.5, -0.5, 0.5, 1.5; mean y = 1225
        // sxy = -1.5*-25 + -0.5*-325 + 0.5*275 + 1.5*75 = 450, sxx = 5
        assert!((model.slope - 90.0).abs() < 1e-9);
        let mid = model.predict_at(202402.5);
        assert!((mid - 1225.0).abs() < 1e-6);
    }

    #[test]
    fn test_predict_range_follows_calendar() {
        let model = TrendModel::new(0.0, 500.0);
        let months = model.predict_range(MonthIndex::try_from(202311).unwrap(), 3);
        let indices: Vec<i32> = months.iter().map(|(m, _)| m.value()).collect();
        assert_eq!(indices, vec![202312, 202401, 202402]);
        assert!(months.iter().all(|(_, v)| *v == 500.0));
    }

    #[test]
    fn test_model_json_round_trip_is_exact() {
        let series = vec![point(202401, 1234.567), point(202402, 987.654321)];
        let model = TrendModel::fit(&series).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let back: TrendModel = serde_json::from_str(&json).unwrap();

        assert_eq!(back, model);
        let m = MonthIndex::try_from(202405).unwrap();
        assert_eq!(back.predict(m), model.predict(m));
    }
}
