//! Forecasting models and the registry used to instantiate them.

pub mod decompose;
pub mod optim;
pub mod sarima;
pub mod seasonal_trend;
pub mod stats;
pub mod theta;

use crate::core::TimeSeries;
use crate::error::{EtError, Result};

pub use sarima::Sarima;
pub use seasonal_trend::SeasonalTrend;
pub use theta::Theta;

/// Seasonal period of the monthly input data.
pub const SEASONAL_PERIOD: usize = 12;

/// Point predictions with interval bounds, without a time axis.
///
/// Models produce these; the pipeline attaches timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub point: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Prediction {
    /// An empty prediction for a zero horizon.
    pub fn empty() -> Self {
        Self {
            point: vec![],
            lower: vec![],
            upper: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }
}

/// Common interface for all forecasting models.
pub trait Forecaster {
    /// Fit the model to a training series.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Predict `horizon` future steps with intervals at the given
    /// confidence level.
    fn predict_with_intervals(&self, horizon: usize, confidence: f64) -> Result<Prediction>;

    /// In-sample fitted values on the original scale, one per training
    /// observation. `None` before fitting.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Variance of the in-sample residuals. `None` before fitting.
    fn residual_variance(&self) -> Option<f64>;

    /// Minimum number of training observations the model accepts.
    fn min_train_len(&self) -> usize;

    /// Model display name.
    fn name(&self) -> &'static str;
}

/// Reject training series containing NaN or infinite values.
pub(crate) fn check_finite(model: &'static str, series: &TimeSeries) -> Result<()> {
    if let Some(idx) = series.first_non_finite() {
        return Err(EtError::FitFailure {
            model,
            reason: format!("non-finite value at index {idx}"),
        });
    }
    Ok(())
}

/// The three model families offered by the dashboard.
///
/// Each family carries a fixed preset tuned for monthly evapotranspiration
/// data; `build` instantiates a fresh unfitted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Trend plus multiplicative seasonality, decomposition based.
    SeasonalTrend,
    /// SARIMA(2,1,1)(1,0,1)[12] with linear trend.
    Sarima,
    /// Standard Theta method with seasonal adjustment.
    Theta,
}

impl ModelFamily {
    /// All families, in presentation order.
    pub fn all() -> [ModelFamily; 3] {
        [
            ModelFamily::SeasonalTrend,
            ModelFamily::Sarima,
            ModelFamily::Theta,
        ]
    }

    /// Display name used in chart headers and logs.
    pub fn name(&self) -> &'static str {
        match self {
            ModelFamily::SeasonalTrend => "Seasonal Trend",
            ModelFamily::Sarima => "SARIMA",
            ModelFamily::Theta => "Theta",
        }
    }

    /// Instantiate an unfitted model with this family's preset.
    pub fn build(&self) -> Box<dyn Forecaster> {
        match self {
            ModelFamily::SeasonalTrend => {
                Box::new(SeasonalTrend::multiplicative(SEASONAL_PERIOD))
            }
            ModelFamily::Sarima => Box::new(Sarima::monthly_preset()),
            ModelFamily::Theta => Box::new(Theta::seasonal(SEASONAL_PERIOD)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_three_families() {
        let families = ModelFamily::all();
        assert_eq!(families.len(), 3);
        assert_eq!(families[0].name(), "Seasonal Trend");
        assert_eq!(families[1].name(), "SARIMA");
        assert_eq!(families[2].name(), "Theta");
    }

    #[test]
    fn build_returns_unfitted_models() {
        for family in ModelFamily::all() {
            let model = family.build();
            assert!(model.fitted_values().is_none());
            assert!(model.predict_with_intervals(5, 0.8).is_err());
        }
    }
}
