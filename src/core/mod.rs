//! Core data structures shared across the pipeline.

mod forecast;
mod time_series;

pub use forecast::ForecastFrame;
pub use time_series::TimeSeries;
