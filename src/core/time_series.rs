//! Univariate time series with validated timestamps.

use chrono::{DateTime, Months, Utc};

use crate::error::{EtError, Result};

/// A univariate time series of monthly observations.
///
/// Timestamps are validated to be strictly increasing at construction,
/// so downstream code can rely on ordering without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a time series from parallel timestamp and value vectors.
    ///
    /// Returns an error if the lengths differ or the timestamps are not
    /// strictly increasing.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(EtError::ShapeMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        for pair in timestamps.windows(2) {
            if pair[1] <= pair[0] {
                return Err(EtError::TimestampError(format!(
                    "timestamps must be strictly increasing, found {} after {}",
                    pair[1], pair[0]
                )));
            }
        }

        Ok(Self { timestamps, values })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The observation timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// The observation values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Copy out the half-open range `[start, end)` as a new series.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.len() {
            return Err(EtError::InvalidParameter(format!(
                "slice [{start}, {end}) out of range for series of length {}",
                self.len()
            )));
        }

        Ok(Self {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Index of the first non-finite value, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.values.iter().position(|v| !v.is_finite())
    }

    /// Timestamps for `horizon` monthly steps beyond the last observation.
    pub fn extend_monthly(&self, horizon: usize) -> Result<Vec<DateTime<Utc>>> {
        let last = *self
            .timestamps
            .last()
            .ok_or(EtError::InsufficientData { needed: 1, got: 0 })?;

        (1..=horizon)
            .map(|step| {
                last.checked_add_months(Months::new(step as u32))
                    .ok_or_else(|| {
                        EtError::TimestampError(format!(
                            "cannot advance {step} months past {last}"
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn monthly_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| base.checked_add_months(Months::new(i as u32)).unwrap())
            .collect()
    }

    #[test]
    fn create_valid_series() {
        let ts = TimeSeries::new(monthly_timestamps(3), vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ts.len(), 3);
        assert!(!ts.is_empty());
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let result = TimeSeries::new(monthly_timestamps(3), vec![1.0, 2.0]);
        assert!(matches!(result, Err(EtError::ShapeMismatch { .. })));
    }

    #[test]
    fn unsorted_timestamps_rejected() {
        let mut stamps = monthly_timestamps(3);
        stamps.swap(0, 2);
        let result = TimeSeries::new(stamps, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(EtError::TimestampError(_))));
    }

    #[test]
    fn duplicate_timestamps_rejected() {
        let mut stamps = monthly_timestamps(3);
        stamps[1] = stamps[0];
        let result = TimeSeries::new(stamps, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(EtError::TimestampError(_))));
    }

    #[test]
    fn slice_copies_range() {
        let ts = TimeSeries::new(monthly_timestamps(5), vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let window = ts.slice(1, 4).unwrap();
        assert_eq!(window.values(), &[2.0, 3.0, 4.0]);
        assert_eq!(window.timestamps()[0], ts.timestamps()[1]);
    }

    #[test]
    fn slice_can_be_empty() {
        let ts = TimeSeries::new(monthly_timestamps(5), vec![1.0; 5]).unwrap();
        let empty = ts.slice(5, 5).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn slice_out_of_range_rejected() {
        let ts = TimeSeries::new(monthly_timestamps(3), vec![1.0; 3]).unwrap();
        assert!(ts.slice(2, 4).is_err());
        assert!(ts.slice(3, 2).is_err());
    }

    #[test]
    fn detects_non_finite() {
        let ts = TimeSeries::new(monthly_timestamps(3), vec![1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(ts.first_non_finite(), Some(1));

        let clean = TimeSeries::new(monthly_timestamps(2), vec![1.0, 2.0]).unwrap();
        assert_eq!(clean.first_non_finite(), None);
    }

    #[test]
    fn monthly_extension_continues_axis() {
        let ts = TimeSeries::new(monthly_timestamps(3), vec![1.0, 2.0, 3.0]).unwrap();
        let future = ts.extend_monthly(2).unwrap();
        assert_eq!(future.len(), 2);
        assert!(future[0] > *ts.timestamps().last().unwrap());
        assert!(future[1] > future[0]);
        assert_eq!(future[0].format("%Y-%m").to_string(), "2001-04");
    }

    #[test]
    fn monthly_extension_requires_observations() {
        let ts = TimeSeries::new(vec![], vec![]).unwrap();
        assert!(ts.extend_monthly(3).is_err());
    }
}
