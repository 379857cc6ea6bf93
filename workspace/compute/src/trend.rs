//! Additive trend projection for short annual series.
//!
//! Holt's linear trend method (double exponential smoothing) with no
//! within-year seasonal component; the observations are yearly, so there
//! is nothing sub-annual to decompose. Level and trend are initialized
//! from a least-squares line through the series and then smoothed, which
//! keeps the extrapolation exact on perfectly linear histories.

use tracing::debug;

use crate::dataset::RegionSeries;
use crate::error::{ComputeError, Result};

/// Level smoothing parameter.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Trend smoothing parameter.
pub const DEFAULT_BETA: f64 = 0.1;

/// Rounds to 2 decimal places, the precision of every surfaced or cached
/// consumption value.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Holt linear-trend model configuration.
///
/// The model equations are:
/// - Level: `l_t = α × y_t + (1-α) × (l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β × (l_t - l_{t-1}) + (1-β) × b_{t-1}`
/// - Projection: `ŷ_{t+h} = l_t + h × b_t`
#[derive(Debug, Clone, Copy)]
pub struct TrendModel {
    alpha: f64,
    beta: f64,
}

impl Default for TrendModel {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_BETA)
    }
}

impl TrendModel {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0001, 0.9999),
            beta: beta.clamp(0.0001, 0.9999),
        }
    }

    /// Fits the model to a region's historical series.
    ///
    /// Requires at least 2 observations; a shorter series cannot carry a
    /// trend and is rejected rather than extrapolated from a single point.
    pub fn fit(&self, series: &RegionSeries) -> Result<FittedTrend> {
        let points = series.points();
        if points.len() < 2 {
            return Err(ComputeError::ModelFit(format!(
                "at least 2 observations required, got {}",
                points.len()
            )));
        }

        let (mut level, mut trend) = least_squares_line(points);

        // Smooth through the remaining observations.
        for &(_, y) in &points[1..] {
            let previous_level = level;
            level = self.alpha * y + (1.0 - self.alpha) * (previous_level + trend);
            trend = self.beta * (level - previous_level) + (1.0 - self.beta) * trend;
        }

        let last_year = series
            .last_year()
            .ok_or_else(|| ComputeError::ModelFit("series has no observations".to_string()))?;

        debug!(level, trend, last_year, "Fitted trend model");

        Ok(FittedTrend {
            level,
            trend,
            last_year,
        })
    }
}

/// Initial level and per-year trend from a least-squares fit over
/// `(year, value)`. Using the year as the regressor keeps the slope
/// meaningful even when the series has gaps.
fn least_squares_line(points: &[(i32, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(year, _)| *year as f64).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, value)| *value).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for &(year, value) in points {
        let dx = year as f64 - mean_x;
        covariance += dx * (value - mean_y);
        variance += dx * dx;
    }

    let slope = if variance > 0.0 { covariance / variance } else { 0.0 };
    // Level at the first observation.
    let level = mean_y + slope * (points[0].0 as f64 - mean_x);

    (level, slope)
}

/// A fitted per-region model, ready to project values beyond the last
/// observed year.
#[derive(Debug, Clone, Copy)]
pub struct FittedTrend {
    level: f64,
    trend: f64,
    last_year: i32,
}

impl FittedTrend {
    pub fn last_year(&self) -> i32 {
        self.last_year
    }

    /// Projects the consumption for `target_year`.
    ///
    /// The horizon is `target_year - last_observed_year`; a horizon of
    /// zero or less is not a genuine forecast and is an error here (the
    /// orchestrator checks the range before calling). The result is
    /// floored at zero and rounded to 2 decimal places.
    pub fn project(&self, target_year: i32) -> Result<f64> {
        let horizon = target_year - self.last_year;
        if horizon <= 0 {
            return Err(ComputeError::Projection(format!(
                "target year {} is not after the last observed year {}",
                target_year, self.last_year
            )));
        }

        let projected = self.level + f64::from(horizon) * self.trend;
        Ok(round2(projected.max(0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::HistoricalDataset;
    use model::entities::region_consumption::RegionCode;

    fn series_of(points: &[(i32, f64)]) -> RegionSeries {
        let rows = points
            .iter()
            .map(|&(year, value)| (RegionCode::London, year, value))
            .collect();
        HistoricalDataset::from_rows(rows)
            .series_for(RegionCode::London)
            .clone()
    }

    #[test]
    fn test_fit_requires_two_observations() {
        let model = TrendModel::default();
        assert!(matches!(
            model.fit(&series_of(&[])),
            Err(ComputeError::ModelFit(_))
        ));
        assert!(matches!(
            model.fit(&series_of(&[(2020, 100.0)])),
            Err(ComputeError::ModelFit(_))
        ));
    }

    #[test]
    fn test_flat_series_projects_the_level() {
        let model = TrendModel::default();
        let fitted = model.fit(&series_of(&[(2020, 100.0), (2021, 100.0)])).unwrap();
        let projected = fitted.project(2025).unwrap();
        assert!(projected >= 0.0);
        assert!((projected - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_series_extrapolates_exactly() {
        let model = TrendModel::default();
        let fitted = model
            .fit(&series_of(&[(2019, 10.0), (2020, 20.0), (2021, 30.0)]))
            .unwrap();
        assert!((fitted.project(2022).unwrap() - 40.0).abs() < 1e-9);
        assert!((fitted.project(2024).unwrap() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_declining_series_floors_at_zero() {
        let model = TrendModel::default();
        let fitted = model
            .fit(&series_of(&[(2019, 30.0), (2020, 20.0), (2021, 10.0)]))
            .unwrap();
        // Far enough out that the raw line is negative.
        assert_eq!(fitted.project(2040).unwrap(), 0.0);
    }

    #[test]
    fn test_projection_inside_observed_range_is_rejected() {
        let model = TrendModel::default();
        let fitted = model.fit(&series_of(&[(2020, 100.0), (2021, 110.0)])).unwrap();
        assert!(matches!(
            fitted.project(2021),
            Err(ComputeError::Projection(_))
        ));
        assert!(matches!(
            fitted.project(2019),
            Err(ComputeError::Projection(_))
        ));
    }

    #[test]
    fn test_projection_is_rounded_to_two_decimals() {
        let model = TrendModel::default();
        let fitted = model
            .fit(&series_of(&[(2020, 100.111), (2021, 100.333)]))
            .unwrap();
        let projected = fitted.project(2022).unwrap();
        assert_eq!(projected, round2(projected));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(1.239), 1.24);
        assert_eq!(round2(-0.001), -0.0);
    }
}
