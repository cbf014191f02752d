//! Forecasting pipeline: split planning, model runs, backtests and the
//! median ensemble.

pub mod backtest;
pub mod ensemble;
pub mod metrics;
pub mod runner;
pub mod session;
pub mod split;

pub use metrics::{ErrorReport, Metric, MetricValue};
pub use session::{run_session, BranchOutcome, SessionOutcome};
pub use split::SplitPlan;
