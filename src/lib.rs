//! Evapotranspiration forecasting dashboard.
//!
//! Loads monthly ET series for a chosen city, fits three forecasting
//! models (seasonal trend, SARIMA, Theta), backtests each against a
//! percent split, combines the forecasts with a positional median
//! ensemble and renders the result in the terminal.

pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod ui;

/// Commonly used types.
pub mod prelude {
    pub use crate::core::{ForecastFrame, TimeSeries};
    pub use crate::data::{load_registry, load_series, DataSourceConfig, LocationRecord};
    pub use crate::error::{EtError, Result};
    pub use crate::models::{Forecaster, ModelFamily};
    pub use crate::pipeline::{
        run_session, BranchOutcome, ErrorReport, Metric, MetricValue, SessionOutcome, SplitPlan,
    };
}
