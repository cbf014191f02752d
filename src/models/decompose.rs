//! Classical seasonal decomposition shared by the seasonal models.
//!
//! Trend is estimated with a centered moving average, seasonal indices by
//! averaging the detrended values per season. Multiplicative decomposition
//! falls back to additive when the data cannot support ratios.

/// How the seasonal component combines with the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecompositionMode {
    /// y = level + seasonal
    Additive,
    /// y = level * seasonal
    #[default]
    Multiplicative,
}

/// Seasonal component extracted from a series.
#[derive(Debug, Clone)]
pub struct SeasonalComponent {
    /// The mode actually used after fallback rules.
    pub mode: DecompositionMode,
    /// Seasonal value at every observation index. Empty when the series is
    /// too short for decomposition.
    pub full: Vec<f64>,
    /// The last full cycle, used to seasonalize future steps.
    pub last_cycle: Vec<f64>,
}

impl SeasonalComponent {
    /// A component that leaves the series untouched.
    pub fn none() -> Self {
        Self {
            mode: DecompositionMode::Additive,
            full: vec![],
            last_cycle: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    /// Remove the seasonal component from a series.
    pub fn deseasonalize(&self, series: &[f64]) -> Vec<f64> {
        if self.is_empty() {
            return series.to_vec();
        }
        series
            .iter()
            .zip(&self.full)
            .map(|(&y, &s)| match self.mode {
                DecompositionMode::Additive => y - s,
                DecompositionMode::Multiplicative => {
                    if s.abs() < 1e-10 {
                        y
                    } else {
                        y / s
                    }
                }
            })
            .collect()
    }

    /// Reapply the seasonal component at observation index `idx`.
    ///
    /// `idx` must be within the fitted series.
    pub fn seasonalize_at(&self, value: f64, idx: usize) -> f64 {
        if self.is_empty() {
            return value;
        }
        let s = self.full[idx];
        match self.mode {
            DecompositionMode::Additive => value + s,
            DecompositionMode::Multiplicative => value * s,
        }
    }

    /// Reapply the last-cycle pattern to future steps `0..values.len()`.
    pub fn seasonalize_future(&self, values: &[f64]) -> Vec<f64> {
        if self.last_cycle.is_empty() {
            return values.to_vec();
        }
        values
            .iter()
            .enumerate()
            .map(|(i, &y)| {
                let s = self.last_cycle[i % self.last_cycle.len()];
                match self.mode {
                    DecompositionMode::Additive => y + s,
                    DecompositionMode::Multiplicative => y * s,
                }
            })
            .collect()
    }
}

/// Extract the seasonal component of `series` with the given period.
///
/// Multiplicative mode falls back to additive when the series contains
/// non-positive values or any seasonal factor drops below 0.01. Series
/// shorter than two full cycles get an empty component.
pub fn seasonal_component(
    series: &[f64],
    period: usize,
    requested: DecompositionMode,
) -> SeasonalComponent {
    if period == 0 || series.len() < 2 * period {
        return SeasonalComponent::none();
    }

    let mode = effective_mode(series, period, requested);
    let indices = seasonal_indices(series, period, mode);

    let full: Vec<f64> = (0..series.len()).map(|i| indices[i % period]).collect();
    let last_cycle = full[(series.len() - period)..].to_vec();

    SeasonalComponent {
        mode,
        full,
        last_cycle,
    }
}

fn effective_mode(
    series: &[f64],
    period: usize,
    requested: DecompositionMode,
) -> DecompositionMode {
    if requested == DecompositionMode::Additive {
        return DecompositionMode::Additive;
    }
    // Ratios need strictly positive data.
    if series.iter().any(|&y| y <= 0.0) {
        return DecompositionMode::Additive;
    }
    let indices = seasonal_indices(series, period, DecompositionMode::Multiplicative);
    if indices.iter().any(|&s| s < 0.01) {
        return DecompositionMode::Additive;
    }
    DecompositionMode::Multiplicative
}

fn seasonal_indices(series: &[f64], period: usize, mode: DecompositionMode) -> Vec<f64> {
    // Centered moving average trend. Even periods weight the endpoints
    // by a half (2xm-MA).
    let half = period / 2;
    let mut trend = vec![f64::NAN; series.len()];
    for i in half..(series.len() - half) {
        trend[i] = if period % 2 == 0 {
            let mut s = 0.5 * series[i - half] + 0.5 * series[i + half];
            for &val in &series[(i - half + 1)..(i + half)] {
                s += val;
            }
            s / period as f64
        } else {
            series[(i - half)..=(i + half)].iter().sum::<f64>() / period as f64
        };
    }

    let detrended: Vec<f64> = series
        .iter()
        .zip(&trend)
        .map(|(&y, &t)| {
            if t.is_nan() {
                f64::NAN
            } else {
                match mode {
                    DecompositionMode::Additive => y - t,
                    DecompositionMode::Multiplicative => {
                        if t.abs() < 1e-10 {
                            f64::NAN
                        } else {
                            y / t
                        }
                    }
                }
            }
        })
        .collect();

    let mut indices = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, &d) in detrended.iter().enumerate() {
        if !d.is_nan() {
            indices[i % period] += d;
            counts[i % period] += 1;
        }
    }
    for (index, &count) in indices.iter_mut().zip(&counts) {
        if count > 0 {
            *index /= count as f64;
        }
    }

    // Normalize so additive indices sum to zero and multiplicative
    // indices average to one.
    let mean = indices.iter().sum::<f64>() / period as f64;
    match mode {
        DecompositionMode::Additive => {
            for s in &mut indices {
                *s -= mean;
            }
        }
        DecompositionMode::Multiplicative => {
            if mean.abs() > 1e-10 {
                for s in &mut indices {
                    *s /= mean;
                }
            }
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seasonal_series(n: usize, level: f64, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| level + amplitude * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
            .collect()
    }

    #[test]
    fn short_series_gets_no_component() {
        let component = seasonal_component(
            &seasonal_series(20, 50.0, 10.0),
            12,
            DecompositionMode::Multiplicative,
        );
        assert!(component.is_empty());
    }

    #[test]
    fn additive_indices_sum_to_zero() {
        let values = seasonal_series(48, 50.0, 10.0);
        let component = seasonal_component(&values, 12, DecompositionMode::Additive);
        assert_eq!(component.mode, DecompositionMode::Additive);
        let cycle_sum: f64 = component.last_cycle.iter().sum();
        assert_relative_eq!(cycle_sum, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn multiplicative_indices_average_to_one() {
        let values = seasonal_series(48, 50.0, 10.0);
        let component = seasonal_component(&values, 12, DecompositionMode::Multiplicative);
        assert_eq!(component.mode, DecompositionMode::Multiplicative);
        let cycle_mean: f64 =
            component.last_cycle.iter().sum::<f64>() / component.last_cycle.len() as f64;
        assert_relative_eq!(cycle_mean, 1.0, epsilon = 1e-2);
    }

    #[test]
    fn negative_values_fall_back_to_additive() {
        let values = seasonal_series(48, 0.0, 10.0);
        let component = seasonal_component(&values, 12, DecompositionMode::Multiplicative);
        assert_eq!(component.mode, DecompositionMode::Additive);
    }

    #[test]
    fn deseasonalize_then_seasonalize_round_trips() {
        let values = seasonal_series(48, 50.0, 10.0);
        let component = seasonal_component(&values, 12, DecompositionMode::Multiplicative);
        let flat = component.deseasonalize(&values);
        for (i, &f) in flat.iter().enumerate() {
            assert_relative_eq!(component.seasonalize_at(f, i), values[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn future_pattern_repeats_last_cycle() {
        let values = seasonal_series(48, 50.0, 10.0);
        let component = seasonal_component(&values, 12, DecompositionMode::Additive);
        let flat = vec![0.0; 24];
        let seasonalized = component.seasonalize_future(&flat);
        for i in 0..12 {
            assert_relative_eq!(seasonalized[i], seasonalized[i + 12], epsilon = 1e-12);
        }
    }
}
