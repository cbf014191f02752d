//! Percent-split backtesting over the full series.

use tracing::debug;

use crate::core::TimeSeries;
use crate::error::{EtError, Result};
use crate::models::ModelFamily;
use crate::pipeline::metrics::{score, ErrorReport};
use crate::pipeline::runner::CONFIDENCE_LEVEL;
use crate::pipeline::split::SplitPlan;

/// Backtest `family` using the plan's percent split.
///
/// The model is fitted on the leading `train_percent` share of the full
/// series and scored on the remainder. A plan that allocates everything
/// to training produces a report where every metric is undefined.
pub fn backtest(
    family: ModelFamily,
    series: &TimeSeries,
    plan: &SplitPlan,
) -> Result<ErrorReport> {
    if plan.len != series.len() {
        return Err(EtError::ShapeMismatch {
            expected: plan.len,
            got: series.len(),
        });
    }

    let train_len = plan.backtest_train_len();
    let test_len = plan.backtest_test_len();
    debug!(
        model = family.name(),
        train_len, test_len, "backtesting model"
    );

    let train = series.slice(0, train_len)?;
    let mut model = family.build();
    if train.len() < model.min_train_len() {
        return Err(EtError::InsufficientData {
            needed: model.min_train_len(),
            got: train.len(),
        });
    }
    model.fit(&train)?;

    let prediction = model.predict_with_intervals(test_len, CONFIDENCE_LEVEL)?;
    let actual = &series.values()[train_len..];
    score(actual, &prediction.point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::metrics::{Metric, MetricValue};
    use chrono::{DateTime, Months, TimeZone, Utc};

    fn monthly_series(n: usize) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<DateTime<Utc>> = (0..n)
            .map(|i| base.checked_add_months(Months::new(i as u32)).unwrap())
            .collect();
        let values: Vec<f64> = (0..n)
            .map(|i| {
                40.0 + 0.2 * i as f64
                    + 6.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin()
            })
            .collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    #[test]
    fn reports_numeric_metrics_for_real_split() {
        let series = monthly_series(120);
        let plan = SplitPlan::plan(120, 90, 12).unwrap();

        for family in ModelFamily::all() {
            let report = backtest(family, &series, &plan).unwrap();
            for metric in Metric::ALL {
                let value = report.get(metric).value();
                assert!(value.is_some(), "{} {}", family.name(), metric.as_str());
                assert!(value.unwrap().is_finite());
            }
        }
    }

    #[test]
    fn full_training_split_gives_undefined_metrics() {
        let series = monthly_series(60);
        let plan = SplitPlan::plan(60, 60, 24).unwrap();

        let report = backtest(ModelFamily::Theta, &series, &plan).unwrap();
        for metric in Metric::ALL {
            assert_eq!(report.get(metric), MetricValue::Undefined);
        }
    }

    #[test]
    fn theta_beats_noise_on_trend() {
        let series = monthly_series(120);
        let plan = SplitPlan::plan(120, 96, 12).unwrap();
        let report = backtest(ModelFamily::Theta, &series, &plan).unwrap();

        // The values run 40..64, so a sane model stays within a small
        // fraction of that range.
        if let MetricValue::Value(mae) = report.get(Metric::Mae) {
            assert!(mae < 15.0, "mae {mae} too large");
        } else {
            panic!("mae should be defined");
        }
    }
}
