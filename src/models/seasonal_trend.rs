//! Seasonal-trend forecasting model.
//!
//! A decomposition-based model: multiplicative seasonality extracted by
//! classical decomposition, a least-squares linear trend on the
//! deseasonalized series, and residual-based prediction intervals.

use crate::core::TimeSeries;
use crate::error::{EtError, Result};
use crate::models::decompose::{seasonal_component, DecompositionMode, SeasonalComponent};
use crate::models::stats::{linear_trend, quantile_normal};
use crate::models::{check_finite, Forecaster, Prediction};

/// Linear trend with multiplicative seasonality.
#[derive(Debug, Clone)]
pub struct SeasonalTrend {
    period: usize,
    seasonal: Option<SeasonalComponent>,
    slope: Option<f64>,
    intercept: Option<f64>,
    n: usize,
    fitted: Option<Vec<f64>>,
    residual_variance: Option<f64>,
}

impl SeasonalTrend {
    /// Model with multiplicative seasonality at the given period.
    ///
    /// Series shorter than two full cycles are fitted as a plain trend.
    pub fn multiplicative(period: usize) -> Self {
        Self {
            period,
            seasonal: None,
            slope: None,
            intercept: None,
            n: 0,
            fitted: None,
            residual_variance: None,
        }
    }

    /// The trend slope after fitting.
    pub fn slope(&self) -> Option<f64> {
        self.slope
    }
}

impl Forecaster for SeasonalTrend {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        check_finite(self.name(), series)?;
        let values = series.values();
        if values.len() < self.min_train_len() {
            return Err(EtError::InsufficientData {
                needed: self.min_train_len(),
                got: values.len(),
            });
        }

        let seasonal = seasonal_component(values, self.period, DecompositionMode::Multiplicative);
        let deseasonalized = seasonal.deseasonalize(values);
        let (slope, intercept) = linear_trend(&deseasonalized);

        let fitted: Vec<f64> = (0..values.len())
            .map(|i| seasonal.seasonalize_at(intercept + slope * i as f64, i))
            .collect();
        let residual_variance = values
            .iter()
            .zip(&fitted)
            .map(|(&y, &f)| (y - f).powi(2))
            .sum::<f64>()
            / values.len() as f64;

        self.n = values.len();
        self.slope = Some(slope);
        self.intercept = Some(intercept);
        self.seasonal = Some(seasonal);
        self.fitted = Some(fitted);
        self.residual_variance = Some(residual_variance);

        Ok(())
    }

    fn predict_with_intervals(&self, horizon: usize, confidence: f64) -> Result<Prediction> {
        let slope = self.slope.ok_or(EtError::FitRequired)?;
        let intercept = self.intercept.ok_or(EtError::FitRequired)?;
        let seasonal = self.seasonal.as_ref().ok_or(EtError::FitRequired)?;

        if horizon == 0 {
            return Ok(Prediction::empty());
        }

        let flat: Vec<f64> = (0..horizon)
            .map(|h| intercept + slope * (self.n + h) as f64)
            .collect();
        let point = seasonal.seasonalize_future(&flat);

        let sigma = self.residual_variance.unwrap_or(0.0).sqrt();
        let z = quantile_normal((1.0 + confidence) / 2.0);

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, &p) in (1..=horizon).zip(&point) {
            // Uncertainty widens with distance from the training window.
            let se = sigma * (1.0 + h as f64 / self.n as f64).sqrt();
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
        8
    }

    fn name(&self) -> &'static str {
        "Seasonal Trend"
    }
}
