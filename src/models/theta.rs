//! Theta forecasting model.
//!
//! Standard Theta method (theta = 2) in the state-space formulation of
//! Fiorucci et al. (2016): simple exponential smoothing on the
//! deseasonalized series plus a drift term from the regression slope.

use crate::core::TimeSeries;
use crate::error::{EtError, Result};
use crate::models::decompose::{seasonal_component, DecompositionMode, SeasonalComponent};
use crate::models::stats::{linear_trend, quantile_normal};
use crate::models::{check_finite, Forecaster, Prediction};

/// Theta model with fixed smoothing parameter.
#[derive(Debug, Clone)]
pub struct Theta {
    theta: f64,
    alpha: f64,
    period: usize,
    seasonal: Option<SeasonalComponent>,
    slope: Option<f64>,
    level: Option<f64>,
    fitted: Option<Vec<f64>>,
    residual_variance: Option<f64>,
}

impl Theta {
    /// Non-seasonal standard Theta model (theta = 2, alpha = 0.1).
    pub fn new() -> Self {
        Self {
            theta: 2.0,
            alpha: 0.1,
            period: 0,
            seasonal: None,
            slope: None,
            level: None,
            fitted: None,
            residual_variance: None,
        }
    }

    /// Seasonal Theta model with multiplicative decomposition.
    pub fn seasonal(period: usize) -> Self {
        Self {
            period,
            ..Self::new()
        }
    }

    /// The regression slope after fitting.
    pub fn slope(&self) -> Option<f64> {
        self.slope
    }
}

impl Default for Theta {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for Theta {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        check_finite(self.name(), series)?;
        let values = series.values();
        if values.len() < self.min_train_len() {
            return Err(EtError::InsufficientData {
                needed: self.min_train_len(),
                got: values.len(),
            });
        }

        let seasonal = if self.period > 0 {
            seasonal_component(values, self.period, DecompositionMode::Multiplicative)
        } else {
            SeasonalComponent::none()
        };
        let deseasonalized = seasonal.deseasonalize(values);

        let (slope, _) = linear_trend(&deseasonalized);
        self.slope = Some(slope);

        // SES over the deseasonalized series. The one-step-ahead forecast
        // at each position, reseasonalized, is the fitted value.
        let mut level = deseasonalized[0];
        let mut fitted = Vec::with_capacity(values.len());
        let mut residuals = Vec::with_capacity(values.len());

        fitted.push(seasonal.seasonalize_at(deseasonalized[0], 0));
        residuals.push(0.0);

        for i in 1..values.len() {
            let one_step = seasonal.seasonalize_at(level, i);
            fitted.push(one_step);
            residuals.push(values[i] - one_step);
            level = self.alpha * deseasonalized[i] + (1.0 - self.alpha) * level;
        }

        let tail = &residuals[1..];
        self.residual_variance =
            Some(tail.iter().map(|r| r * r).sum::<f64>() / tail.len() as f64);
        self.level = Some(level);
        self.seasonal = Some(seasonal);
        self.fitted = Some(fitted);

        Ok(())
    }

    fn predict_with_intervals(&self, horizon: usize, confidence: f64) -> Result<Prediction> {
        let level = self.level.ok_or(EtError::FitRequired)?;
        let slope = self.slope.ok_or(EtError::FitRequired)?;
        let seasonal = self.seasonal.as_ref().ok_or(EtError::FitRequired)?;

        if horizon == 0 {
            return Ok(Prediction::empty());
        }

        // forecast(h) = level + (1 - 1/theta) * slope * (1/alpha + h - 1)
        let drift = (1.0 - 1.0 / self.theta) * slope;
        let flat: Vec<f64> = (1..=horizon)
            .map(|h| level + drift * (1.0 / self.alpha + (h as f64 - 1.0)))
            .collect();
        let point = seasonal.seasonalize_future(&flat);

        let variance = self.residual_variance.unwrap_or(0.0);
        let z = quantile_normal((1.0 + confidence) / 2.0);
        let beta = 1.0 - self.alpha;

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, &p) in (1..=horizon).zip(&point) {
            // SES error variance grows geometrically with the horizon.
            let factor = if h == 1 {
                1.0
            } else {
                1.0 + beta.powi(2) * (1.0 - beta.powi(2 * (h as i32 - 1))) / (1.0 - beta.powi(2))
            };
            let se = (variance * factor).sqrt();
            lower.push(p - z * se);
            upper.push(p + z * se);
        }

        Ok(Prediction {
            point,
            lower,
            upper,
        })
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residual_variance(&self) -> Option<f64> {
        self.residual_variance
    }

    fn min_train_len(&self) -> usize {
        4
    }

    fn name(&self) -> &'static str {
        "Theta"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Months, TimeZone, Utc};

    fn monthly_series(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<DateTime<Utc>> = (0..values.len())
            .map(|i| base.checked_add_months(Months::new(i as u32)).unwrap())
            .collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    #[test]
    fn trend_series_forecast_continues_upward() {
        let values: Vec<f64> = (0..50).map(|i| 10.0 + 2.0 * i as f64).collect();
        let ts = monthly_series(values.clone());

        let mut model = Theta::new();
        model.fit(&ts).unwrap();
        assert!(model.slope().unwrap() > 0.0);

        let pred = model.predict_with_intervals(5, 0.8).unwrap();
        assert_eq!(pred.len(), 5);
        assert!(pred.point[0] > values.last().unwrap() - 10.0);
    }

    #[test]
    fn seasonal_fit_produces_full_length_fitted() {
        let values: Vec<f64> = (0..48)
            .map(|i| 50.0 + 10.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
            .collect();
        let ts = monthly_series(values);

        let mut model = Theta::seasonal(12);
        model.fit(&ts).unwrap();

        assert_eq!(model.fitted_values().unwrap().len(), 48);
        assert!(model.residual_variance().unwrap() >= 0.0);
    }

    #[test]
    fn intervals_bracket_points() {
        let values: Vec<f64> = (0..50)
            .map(|i| 10.0 + 0.5 * i as f64 + (i as f64 * 0.3).sin())
            .collect();
        let ts = monthly_series(values);

        let mut model = Theta::new();
        model.fit(&ts).unwrap();
        let pred = model.predict_with_intervals(6, 0.8).unwrap();

        for i in 0..6 {
            assert!(pred.lower[i] <= pred.point[i]);
            assert!(pred.point[i] <= pred.upper[i]);
        }
    }

    #[test]
    fn insufficient_data_rejected() {
        let ts = monthly_series(vec![1.0, 2.0, 3.0]);
        let mut model = Theta::new();
        assert!(matches!(
            model.fit(&ts),
            Err(EtError::InsufficientData { .. })
        ));
    }

    #[test]
    fn non_finite_training_values_rejected() {
        let ts = monthly_series(vec![1.0, f64::NAN, 3.0, 4.0, 5.0]);
        let mut model = Theta::new();
        assert!(matches!(model.fit(&ts), Err(EtError::FitFailure { .. })));
    }

    #[test]
    fn predict_requires_fit() {
        let model = Theta::new();
        assert!(matches!(
            model.predict_with_intervals(5, 0.8),
            Err(EtError::FitRequired)
        ));
    }

    #[test]
    fn zero_horizon_is_empty() {
        let ts = monthly_series((0..20).map(|i| i as f64).collect());
        let mut model = Theta::new();
        model.fit(&ts).unwrap();
        assert!(model.predict_with_intervals(0, 0.8).unwrap().is_empty());
    }
}
