//! Precomputed plotting data for one forecast panel.
//!
//! Chart widgets borrow point slices, so each recompute materializes
//! the data once and rendering borrows from here every frame.

use crate::core::{ForecastFrame, TimeSeries};
use crate::error::EtError;
use crate::pipeline::ErrorReport;

/// Point buffers and axis bounds for one panel chart.
#[derive(Debug, Clone)]
pub struct ChartData {
    /// Training actuals, indexed by months since series start.
    pub actual_train: Vec<(f64, f64)>,
    /// Held-out actuals past the kept months. Empty when all months are kept.
    pub actual_held: Vec<(f64, f64)>,
    /// Forecast points: fitted history then future predictions.
    pub forecast: Vec<(f64, f64)>,
    pub lower: Vec<(f64, f64)>,
    pub upper: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

impl ChartData {
    /// Build chart buffers for a forecast over the given actuals.
    pub fn build(train: &TimeSeries, held_out: &TimeSeries, frame: &ForecastFrame) -> Self {
        let actual_train = indexed(train.values(), 0);
        let actual_held = indexed(held_out.values(), train.len());
        let forecast = indexed(frame.point(), 0);
        let lower = indexed(frame.lower(), 0);
        let upper = indexed(frame.upper(), 0);

        let x_max = frame.len().max(train.len() + held_out.len()).max(1) as f64;

        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for &(_, y) in actual_train
            .iter()
            .chain(&actual_held)
            .chain(&lower)
            .chain(&upper)
        {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if !y_min.is_finite() || !y_max.is_finite() {
            y_min = 0.0;
            y_max = 1.0;
        }
        let pad = ((y_max - y_min) * 0.05).max(0.1);
        let y_bounds = [y_min - pad, y_max + pad];

        let x_labels = axis_labels(train, frame, x_max);
        let y_labels = vec![
            format!("{:.1}", y_bounds[0]),
            format!("{:.1}", (y_bounds[0] + y_bounds[1]) / 2.0),
            format!("{:.1}", y_bounds[1]),
        ];

        Self {
            actual_train,
            actual_held,
            forecast,
            lower,
            upper,
            x_bounds: [0.0, x_max],
            y_bounds,
            x_labels,
            y_labels,
        }
    }
}

fn indexed(values: &[f64], offset: usize) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| ((offset + i) as f64, v))
        .collect()
}

fn axis_labels(train: &TimeSeries, frame: &ForecastFrame, x_max: f64) -> Vec<String> {
    let start = train
        .timestamps()
        .first()
        .or_else(|| frame.timestamps().first());
    let end = frame
        .timestamps()
        .last()
        .or_else(|| train.timestamps().last());
    match (start, end) {
        (Some(s), Some(e)) => vec![
            s.format("%Y-%m").to_string(),
            e.format("%Y-%m").to_string(),
        ],
        _ => vec!["0".into(), format!("{x_max:.0}")],
    }
}

/// One panel of the dashboard: a model branch or the ensemble.
#[derive(Debug, Clone)]
pub struct PanelView {
    /// Header in the form "«City» with «Model»".
    pub title: String,
    /// Chart data when the forecast succeeded, the error otherwise.
    pub chart: Result<ChartData, EtError>,
    /// Backtest report when it succeeded. The ensemble panel has none.
    pub report: Option<Result<ErrorReport, EtError>>,
}
