//! Backtest error metrics.
//!
//! Each metric scores a predicted segment against the held-out actuals.
//! Metrics that are undefined for a particular input (MAPE with zero
//! actuals, MASE with a zero naive error) report a sentinel instead of
//! poisoning the rest of the report.

use crate::error::{EtError, Result};

/// The six error metrics shown in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Mape,
    Smape,
    Mae,
    Mase,
    Mse,
    Rmse,
}

impl Metric {
    /// All metrics, in presentation order.
    pub const ALL: [Metric; 6] = [
        Metric::Mape,
        Metric::Smape,
        Metric::Mae,
        Metric::Mase,
        Metric::Mse,
        Metric::Rmse,
    ];

    /// Short lowercase name used in tables and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Mape => "mape",
            Metric::Smape => "smape",
            Metric::Mae => "mae",
            Metric::Mase => "mase",
            Metric::Mse => "mse",
            Metric::Rmse => "rmse",
        }
    }
}

/// A metric score, or the sentinel for inputs the metric cannot score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Value(f64),
    Undefined,
}

impl MetricValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            MetricValue::Undefined => None,
        }
    }
}

/// Scores for all six metrics over one backtest.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    entries: [(Metric, MetricValue); 6],
}

impl ErrorReport {
    pub fn get(&self, metric: Metric) -> MetricValue {
        self.entries
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, v)| *v)
            .unwrap_or(MetricValue::Undefined)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, MetricValue)> + '_ {
        self.entries.iter().copied()
    }
}

/// Score `predicted` against `actual` on all six metrics.
///
/// The segments must agree in length; empty segments yield a report
/// where every metric is undefined.
pub fn score(actual: &[f64], predicted: &[f64]) -> Result<ErrorReport> {
    if actual.len() != predicted.len() {
        return Err(EtError::ShapeMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let entries = [
        (Metric::Mape, mape(actual, predicted)),
        (Metric::Smape, smape(actual, predicted)),
        (Metric::Mae, mae(actual, predicted)),
        (Metric::Mase, mase(actual, predicted)),
        (Metric::Mse, mse(actual, predicted)),
        (Metric::Rmse, rmse(actual, predicted)),
    ];

    Ok(ErrorReport { entries })
}

fn mape(actual: &[f64], predicted: &[f64]) -> MetricValue {
    if actual.is_empty() || actual.iter().any(|&a| a == 0.0) {
        return MetricValue::Undefined;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| ((a - p) / a).abs())
        .sum();
    MetricValue::Value(100.0 * sum / actual.len() as f64)
}

fn smape(actual: &[f64], predicted: &[f64]) -> MetricValue {
    if actual.is_empty() {
        return MetricValue::Undefined;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| {
            let denom = a.abs() + p.abs();
            // A 0/0 term means actual and predicted agree exactly, so it
            // contributes zero error rather than poisoning the whole score.
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        })
        .sum();
    MetricValue::Value(100.0 * sum / actual.len() as f64)
}

fn mae(actual: &[f64], predicted: &[f64]) -> MetricValue {
    if actual.is_empty() {
        return MetricValue::Undefined;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| (a - p).abs())
        .sum();
    MetricValue::Value(sum / actual.len() as f64)
}

fn mase(actual: &[f64], predicted: &[f64]) -> MetricValue {
    if actual.len() < 2 {
        return MetricValue::Undefined;
    }
    let naive: f64 = actual
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .sum::<f64>()
        / (actual.len() - 1) as f64;
    if naive == 0.0 {
        return MetricValue::Undefined;
    }
    match mae(actual, predicted) {
        MetricValue::Value(v) => MetricValue::Value(v / naive),
        MetricValue::Undefined => MetricValue::Undefined,
    }
}

fn mse(actual: &[f64], predicted: &[f64]) -> MetricValue {
    if actual.is_empty() {
        return MetricValue::Undefined;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| (a - p).powi(2))
        .sum();
    MetricValue::Value(sum / actual.len() as f64)
}

fn rmse(actual: &[f64], predicted: &[f64]) -> MetricValue {
    match mse(actual, predicted) {
        MetricValue::Value(v) => MetricValue::Value(v.sqrt()),
        MetricValue::Undefined => MetricValue::Undefined,
    }
}
