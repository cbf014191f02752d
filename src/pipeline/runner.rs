//! Fits one model family and assembles its forecast frame.

use tracing::debug;

use crate::core::{ForecastFrame, TimeSeries};
use crate::error::{EtError, Result};
use crate::models::{Forecaster, ModelFamily};
use crate::pipeline::split::SplitPlan;

/// Confidence level for all prediction intervals.
pub const CONFIDENCE_LEVEL: f64 = 0.8;

/// Fit `family` on the kept window of `series` and forecast the plan's
/// horizon.
///
/// The returned frame includes history: fitted values over the training
/// window followed by the future predictions, on one monthly time axis.
pub fn run_model(
    family: ModelFamily,
    series: &TimeSeries,
    plan: &SplitPlan,
) -> Result<ForecastFrame> {
    if plan.len != series.len() {
        return Err(EtError::ShapeMismatch {
            expected: plan.len,
            got: series.len(),
        });
    }

    let train = series.slice(0, plan.keep)?;
    debug!(
        model = family.name(),
        train_len = train.len(),
        horizon = plan.horizon,
        "fitting model"
    );

    let mut model = family.build();
    if train.len() < model.min_train_len() {
        return Err(EtError::InsufficientData {
            needed: model.min_train_len(),
            got: train.len(),
        });
    }
    model.fit(&train)?;

    let fitted = model.fitted_values().ok_or(EtError::FitRequired)?.to_vec();
    let sigma = model.residual_variance().unwrap_or(0.0).sqrt();
    let z = crate::models::stats::quantile_normal((1.0 + CONFIDENCE_LEVEL) / 2.0);

    // History rows carry flat residual bands around the fitted values.
    let mut point = Vec::with_capacity(plan.keep + plan.horizon);
    let mut lower = Vec::with_capacity(plan.keep + plan.horizon);
    let mut upper = Vec::with_capacity(plan.keep + plan.horizon);
    for &f in &fitted {
        point.push(f);
        lower.push(f - z * sigma);
        upper.push(f + z * sigma);
    }

    let prediction = model.predict_with_intervals(plan.horizon, CONFIDENCE_LEVEL)?;
    if prediction.len() != plan.horizon {
        return Err(EtError::ShapeMismatch {
            expected: plan.horizon,
            got: prediction.len(),
        });
    }
    point.extend(prediction.point);
    lower.extend(prediction.lower);
    upper.extend(prediction.upper);

    let mut timestamps = train.timestamps().to_vec();
    timestamps.extend(train.extend_monthly(plan.horizon)?);

    ForecastFrame::new(timestamps, point, lower, upper)
}
