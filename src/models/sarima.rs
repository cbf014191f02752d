//! Seasonal ARIMA fitted by conditional sum of squares.
//!
//! Differencing (regular and seasonal) reduces the series to a form
//! modeled by AR, MA and trend terms; coefficients are estimated with
//! Nelder-Mead on the conditional sum of squared residuals.

use crate::core::TimeSeries;
use crate::error::{EtError, Result};
use crate::models::optim::{nelder_mead, SimplexConfig};
use crate::models::stats::{mean, quantile_normal};
use crate::models::{check_finite, Forecaster, Prediction};

/// Full seasonal ARIMA order (p,d,q)(P,D,Q)[s].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub seasonal_p: usize,
    pub seasonal_d: usize,
    pub seasonal_q: usize,
    pub period: usize,
}

impl SarimaOrder {
    /// AR/MA lookback on the differenced scale.
    fn warmup(&self) -> usize {
        let ar = self.p.max(self.seasonal_p * self.period);
        let ma = self.q.max(self.seasonal_q * self.period);
        ar.max(ma)
    }

    /// Observations consumed by differencing.
    fn diff_loss(&self) -> usize {
        self.d + self.seasonal_d * self.period
    }

    fn param_count(&self) -> usize {
        // intercept, trend slope, then AR, seasonal AR, MA, seasonal MA
        2 + self.p + self.seasonal_p + self.q + self.seasonal_q
    }
}

/// Seasonal ARIMA model with a linear trend on the differenced scale.
#[derive(Debug, Clone)]
pub struct Sarima {
    order: SarimaOrder,
    params: Option<Vec<f64>>,
    history: Option<Vec<f64>>,
    seasonal_diffed: Option<Vec<f64>>,
    diffed: Option<Vec<f64>>,
    residuals_diff: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residual_variance: Option<f64>,
}

impl Sarima {
    /// Create a model with the given order.
    ///
    /// Differencing is limited to `d <= 2` and `D <= 1`.
    pub fn new(order: SarimaOrder) -> Result<Self> {
        if order.d > 2 || order.seasonal_d > 1 {
            return Err(EtError::InvalidParameter(format!(
                "differencing order out of range: d={}, D={}",
                order.d, order.seasonal_d
            )));
        }
        if (order.seasonal_p > 0 || order.seasonal_q > 0 || order.seasonal_d > 0)
            && order.period < 2
        {
            return Err(EtError::InvalidParameter(
                "seasonal terms require a period of at least 2".into(),
            ));
        }
        Ok(Self {
            order,
            params: None,
            history: None,
            seasonal_diffed: None,
            diffed: None,
            residuals_diff: None,
            fitted: None,
            residual_variance: None,
        })
    }

    /// SARIMA(2,1,1)(1,0,1)[12] with linear trend, the preset used for
    /// monthly evapotranspiration data.
    pub fn monthly_preset() -> Self {
        // Order validated above, construction cannot fail.
        Self::new(SarimaOrder {
            p: 2,
            d: 1,
            q: 1,
            seasonal_p: 1,
            seasonal_d: 0,
            seasonal_q: 1,
            period: 12,
        })
        .unwrap_or_else(|_| unreachable!("preset order is valid"))
    }

    /// The fitted order.
    pub fn order(&self) -> SarimaOrder {
        self.order
    }

    /// One-step prediction of `w[t]` from prior values and residuals.
    ///
    /// Indices below zero contribute nothing, matching the conditional
    /// treatment of the startup window.
    fn one_step(
        order: &SarimaOrder,
        params: &[f64],
        w: &dyn Fn(i64) -> f64,
        e: &dyn Fn(i64) -> f64,
        t: i64,
    ) -> f64 {
        let mut k = 0;
        let intercept = params[k];
        k += 1;
        let trend = params[k];
        k += 1;

        let mut pred = intercept + trend * t as f64;
        for i in 1..=order.p {
            pred += params[k] * w(t - i as i64);
            k += 1;
        }
        for i in 1..=order.seasonal_p {
            pred += params[k] * w(t - (i * order.period) as i64);
            k += 1;
        }
        for j in 1..=order.q {
            pred += params[k] * e(t - j as i64);
            k += 1;
        }
        for j in 1..=order.seasonal_q {
            pred += params[k] * e(t - (j * order.period) as i64);
            k += 1;
        }
        pred
    }

    /// Residuals of `w` under `params`; positions before the warmup are zero.
    fn residuals_for(order: &SarimaOrder, params: &[f64], w: &[f64]) -> Vec<f64> {
        let warmup = order.warmup();
        let mut residuals = vec![0.0; w.len()];
        for t in warmup..w.len() {
            let lookup_w = |i: i64| if i >= 0 { w[i as usize] } else { 0.0 };
            let lookup_e = |i: i64| {
                if i >= 0 {
                    residuals[i as usize]
                } else {
                    0.0
                }
            };
            let pred = Self::one_step(order, params, &lookup_w, &lookup_e, t as i64);
            residuals[t] = w[t] - pred;
        }
        residuals
    }

    fn css(order: &SarimaOrder, params: &[f64], w: &[f64]) -> f64 {
        let warmup = order.warmup();
        let residuals = Self::residuals_for(order, params, w);
        let sse: f64 = residuals[warmup..].iter().map(|e| e * e).sum();
        if sse.is_finite() {
            sse
        } else {
            f64::MAX
        }
    }
}

impl Forecaster for Sarima {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        check_finite(self.name(), series)?;
        let values = series.values();
        if values.len() < self.min_train_len() {
            return Err(EtError::InsufficientData {
                needed: self.min_train_len(),
                got: values.len(),
            });
        }

        let order = self.order;
        let seasonal_diffed =
            seasonal_difference(values, order.seasonal_d, order.period);
        let w = difference(&seasonal_diffed, order.d);
        let warmup = order.warmup();
        if w.len() <= warmup + 2 {
            return Err(EtError::InsufficientData {
                needed: order.diff_loss() + warmup + 3,
                got: values.len(),
            });
        }

        // Start from a flat model at the sample mean of the stable region.
        let mut initial = vec![0.0; order.param_count()];
        initial[0] = mean(&w[warmup..]);
        for coeff in initial.iter_mut().skip(2) {
            *coeff = 0.1;
        }

        let spread = w.iter().map(|x| x.abs()).fold(1.0, f64::max);
        let mut bounds = vec![(-0.98, 0.98); order.param_count()];
        bounds[0] = (-1e3 * spread, 1e3 * spread);
        bounds[1] = (-10.0 * spread, 10.0 * spread);

        let config = SimplexConfig {
            max_iter: 2000,
            tolerance: 1e-8,
            ..Default::default()
        };
        let result = nelder_mead(
            |params| Self::css(&order, params, &w),
            &initial,
            Some(&bounds),
            config,
        );
        if !result.value.is_finite() {
            return Err(EtError::FitFailure {
                model: self.name(),
                reason: "conditional sum of squares did not evaluate to a finite value".into(),
            });
        }

        let params = result.point;
        let residuals = Self::residuals_for(&order, &params, &w);
        let tail = &residuals[warmup..];
        let residual_variance = tail.iter().map(|e| e * e).sum::<f64>() / tail.len() as f64;

        // Fitted values on the original scale. The realized differenced
        // value w[t] and the original y share an offset, so replacing
        // w[t] with its prediction shifts y by the same amount. Startup
        // positions keep the actuals.
        let offset = order.diff_loss();
        let mut fitted = values.to_vec();
        for (t, &e) in residuals.iter().enumerate() {
            if t >= warmup {
                fitted[t + offset] = values[t + offset] - e;
            }
        }

        self.params = Some(params);
        self.history = Some(values.to_vec());
        self.seasonal_diffed = Some(seasonal_diffed);
        self.diffed = Some(w);
        self.residuals_diff = Some(residuals);
        self.fitted = Some(fitted);
        self.residual_variance = Some(residual_variance);

        Ok(())
    }

    fn predict_with_intervals(&self, horizon: usize, confidence: f64) -> Result<Prediction> {
        let params = self.params.as_ref().ok_or(EtError::FitRequired)?;
        let history = self.history.as_ref().ok_or(EtError::FitRequired)?;
        let seasonal_diffed = self.seasonal_diffed.as_ref().ok_or(EtError::FitRequired)?;
        let w = self.diffed.as_ref().ok_or(EtError::FitRequired)?;
        let residuals = self.residuals_diff.as_ref().ok_or(EtError::FitRequired)?;

        if horizon == 0 {
            return Ok(Prediction::empty());
        }

        let order = self.order;
        let n = w.len() as i64;

        // Iterate the recursion forward; future shocks are zero.
        let mut future_w = Vec::with_capacity(horizon);
        for k in 0..horizon {
            let lookup_w = |i: i64| -> f64 {
                if i < 0 {
                    0.0
                } else if i < n {
                    w[i as usize]
                } else {
                    future_w[(i - n) as usize]
                }
            };
            let lookup_e = |i: i64| -> f64 {
                if (0..n).contains(&i) {
                    residuals[i as usize]
                } else {
                    0.0
                }
            };
            let pred = Self::one_step(&order, params, &lookup_w, &lookup_e, n + k as i64);
            future_w.push(pred);
        }

        // Undo regular differencing against the seasonally differenced
        // series, then undo seasonal differencing against the original.
        let future_z = integrate(&future_w, seasonal_diffed, order.d);
        let point = seasonal_integrate(&future_z, history, order.seasonal_d, order.period);

        let sigma = self.residual_variance.unwrap_or(0.0).sqrt();
        let z = quantile_normal((1.0 + confidence) / 2.0);

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, &p) in (1..=horizon).zip(&point) {
            // Integrated models accumulate shock variance roughly
            // linearly in the horizon.
            let se = if order.d + order.seasonal_d > 0 {
                sigma * (h as f64).sqrt()
            } else {
                sigma
            };
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
        self.order.diff_loss() + self.order.warmup() + 5
    }

    fn name(&self) -> &'static str {
        "SARIMA"
    }
}

/// Difference a series `d` times.
fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return vec![];
        }
        result = result.windows(2).map(|pair| pair[1] - pair[0]).collect();
    }
    result
}

/// Seasonally difference a series `d` times at the given period.
fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            return vec![];
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Reverse regular differencing of forecast steps.
///
/// `reference` is the pre-differencing series the forecasts continue.
fn integrate(forecast: &[f64], reference: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || forecast.is_empty() {
        return forecast.to_vec();
    }

    let mut result = forecast.to_vec();
    for level in (0..d).rev() {
        let intermediate = difference(reference, level);
        let init = intermediate.last().copied().unwrap_or(0.0);
        let mut cumsum = init;
        for value in &mut result {
            cumsum += *value;
            *value = cumsum;
        }
    }
    result
}

/// Reverse seasonal differencing of forecast steps (`d` at most 1).
fn seasonal_integrate(forecast: &[f64], reference: &[f64], d: usize, period: usize) -> Vec<f64> {
    if d == 0 || forecast.is_empty() {
        return forecast.to_vec();
    }

    let n = reference.len();
    let mut result = Vec::with_capacity(forecast.len());
    for (k, &value) in forecast.iter().enumerate() {
        let base_idx = n + k - period;
        let base = if base_idx < n {
            reference[base_idx]
        } else {
            result[base_idx - n]
        };
        result.push(value + base);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Months, TimeZone, Utc};

    fn monthly_series(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<DateTime<Utc>> = (0..values.len())
            .map(|i| base.checked_add_months(Months::new(i as u32)).unwrap())
            .collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    #[test]
    fn difference_and_integrate_round_trip() {
        let original = vec![10.0, 12.0, 15.0, 19.0, 24.0];
        let forecast_diff = vec![6.0, 7.0];
        let integrated = integrate(&forecast_diff, &original, 1);
        assert_relative_eq!(integrated[0], 30.0, epsilon = 1e-10);
        assert_relative_eq!(integrated[1], 37.0, epsilon = 1e-10);
    }

    #[test]
    fn seasonal_difference_removes_repeating_pattern() {
        let series = vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
        assert_eq!(seasonal_difference(&series, 1, 3), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn seasonal_integrate_continues_pattern() {
        let reference = vec![1.0, 2.0, 3.0, 4.0];
        let forecast = vec![0.5, 0.5, 0.5, 0.5, 0.5];
        let result = seasonal_integrate(&forecast, &reference, 1, 2);
        // First two steps add onto the last cycle of the reference,
        // later steps onto earlier forecasts.
        assert_relative_eq!(result[0], 3.5, epsilon = 1e-10);
        assert_relative_eq!(result[1], 4.5, epsilon = 1e-10);
        assert_relative_eq!(result[2], 4.0, epsilon = 1e-10);
        assert_relative_eq!(result[3], 5.0, epsilon = 1e-10);
    }

    #[test]
    fn invalid_order_rejected() {
        let order = SarimaOrder {
            p: 1,
            d: 3,
            q: 1,
            seasonal_p: 0,
            seasonal_d: 0,
            seasonal_q: 0,
            period: 0,
        };
        assert!(Sarima::new(order).is_err());
    }

    #[test]
    fn preset_fits_trended_seasonal_series() {
        let values: Vec<f64> = (0..72)
            .map(|i| {
                50.0 + 0.4 * i as f64
                    + 8.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin()
            })
            .collect();
        let ts = monthly_series(values.clone());

        let mut model = Sarima::monthly_preset();
        model.fit(&ts).unwrap();

        let fitted = model.fitted_values().unwrap();
        assert_eq!(fitted.len(), 72);
        assert!(fitted.iter().all(|f| f.is_finite()));

        let pred = model.predict_with_intervals(12, 0.8).unwrap();
        assert_eq!(pred.len(), 12);
        for i in 0..12 {
            assert!(pred.lower[i] <= pred.point[i]);
            assert!(pred.point[i] <= pred.upper[i]);
        }
        // Forecast stays in the neighbourhood of the recent level.
        let last = values[71];
        for &p in &pred.point {
            assert!((p - last).abs() < 50.0, "forecast {p} drifted from {last}");
        }
    }

    #[test]
    fn insufficient_data_rejected() {
        let ts = monthly_series((0..10).map(|i| i as f64).collect());
        let mut model = Sarima::monthly_preset();
        assert!(matches!(
            model.fit(&ts),
            Err(EtError::InsufficientData { .. })
        ));
    }

    #[test]
    fn non_finite_training_values_rejected() {
        let mut values: Vec<f64> = (0..40).map(|i| i as f64).collect();
        values[20] = f64::NAN;
        let ts = monthly_series(values);
        let mut model = Sarima::monthly_preset();
        assert!(matches!(model.fit(&ts), Err(EtError::FitFailure { .. })));
    }

    #[test]
    fn predict_requires_fit() {
        let model = Sarima::monthly_preset();
        assert!(matches!(
            model.predict_with_intervals(6, 0.8),
            Err(EtError::FitRequired)
        ));
    }
}
