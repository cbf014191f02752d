//! One dashboard run: three model branches plus their ensemble.

use tracing::{info, warn};

use crate::core::{ForecastFrame, TimeSeries};
use crate::error::Result;
use crate::models::ModelFamily;
use crate::pipeline::backtest::backtest;
use crate::pipeline::ensemble::combine;
use crate::pipeline::metrics::ErrorReport;
use crate::pipeline::runner::run_model;
use crate::pipeline::split::SplitPlan;

/// The forecast and backtest results of a single model branch.
///
/// Each side can fail independently; a branch failure never disturbs
/// the other branches.
#[derive(Debug, Clone)]
pub struct BranchOutcome {
    pub family: ModelFamily,
    pub forecast: Result<ForecastFrame>,
    pub report: Result<ErrorReport>,
}

/// Everything one slider/city configuration produces.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub plan: SplitPlan,
    /// Training window of the series, for plotting actuals.
    pub train: TimeSeries,
    /// Held-out tail past the kept months. Empty when everything is kept.
    pub held_out: TimeSeries,
    /// One branch per model family, in presentation order.
    pub branches: Vec<BranchOutcome>,
    /// Median ensemble of the three forecasts, or the first branch error.
    pub ensemble: Result<ForecastFrame>,
}

/// Run all three model branches and the ensemble for one configuration.
///
/// Branches are isolated: each fits, forecasts and backtests on its own,
/// and a failure is recorded in that branch's outcome. The ensemble
/// requires all three forecasts; if any is missing it carries the first
/// failing branch's error.
pub fn run_session(series: &TimeSeries, plan: SplitPlan) -> Result<SessionOutcome> {
    let train = series.slice(0, plan.keep)?;
    let held_out = series.slice(plan.keep, plan.len)?;

    let branches: Vec<BranchOutcome> = ModelFamily::all()
        .into_iter()
        .map(|family| {
            let forecast = run_model(family, series, &plan);
            let report = backtest(family, series, &plan);
            match &forecast {
                Ok(frame) => info!(
                    model = family.name(),
                    rows = frame.len(),
                    "forecast complete"
                ),
                Err(err) => warn!(model = family.name(), %err, "forecast failed"),
            }
            BranchOutcome {
                family,
                forecast,
                report,
            }
        })
        .collect();

    let ensemble = match (
        &branches[0].forecast,
        &branches[1].forecast,
        &branches[2].forecast,
    ) {
        (Ok(a), Ok(b), Ok(c)) => combine(&[a.clone(), b.clone(), c.clone()]),
        _ => {
            let first_err = branches
                .iter()
                .find_map(|b| b.forecast.as_ref().err())
                .cloned()
                .expect("at least one branch failed");
            Err(first_err)
        }
    };

    Ok(SessionOutcome {
        plan,
        train,
        held_out,
        branches,
        ensemble,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtError;
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
    fn all_branches_and_ensemble_succeed() {
        let series = monthly_series(120);
        let plan = SplitPlan::plan(120, 100, 36).unwrap();
        let outcome = run_session(&series, plan).unwrap();

        assert_eq!(outcome.branches.len(), 3);
        for branch in &outcome.branches {
            assert!(branch.forecast.is_ok(), "{}", branch.family.name());
            assert!(branch.report.is_ok(), "{}", branch.family.name());
        }
        let ensemble = outcome.ensemble.unwrap();
        assert_eq!(ensemble.len(), 100 + 56);
        assert_eq!(outcome.train.len(), 100);
        assert_eq!(outcome.held_out.len(), 20);
    }

    #[test]
    fn failed_branch_does_not_disturb_others() {
        // Ten kept months are enough for Theta and the seasonal trend
        // but not for SARIMA.
        let series = monthly_series(60);
        let plan = SplitPlan::plan(60, 10, 12).unwrap();
        let outcome = run_session(&series, plan).unwrap();

        let by_family = |family: ModelFamily| {
            outcome
                .branches
                .iter()
                .find(|b| b.family == family)
                .unwrap()
        };
        assert!(by_family(ModelFamily::Theta).forecast.is_ok());
        assert!(by_family(ModelFamily::SeasonalTrend).forecast.is_ok());
        assert!(matches!(
            by_family(ModelFamily::Sarima).forecast,
            Err(EtError::InsufficientData { .. })
        ));

        // The ensemble needs all three, so it carries the failure.
        assert!(outcome.ensemble.is_err());
    }

    #[test]
    fn keeping_everything_leaves_empty_held_out() {
        let series = monthly_series(72);
        let plan = SplitPlan::plan(72, 72, 12).unwrap();
        let outcome = run_session(&series, plan).unwrap();

        assert!(outcome.held_out.is_empty());
        assert_eq!(outcome.train.len(), 72);
        let ensemble = outcome.ensemble.unwrap();
        assert_eq!(ensemble.len(), 72 + 12);
    }
}
