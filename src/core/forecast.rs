//! Forecast frames: point predictions with interval bands on a shared time axis.

use chrono::{DateTime, Utc};

use crate::error::{EtError, Result};

/// A forecast frame covering both fitted history and future predictions.
///
/// All four columns share one length. The interval invariant
/// `lower <= point <= upper` holds at every position.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastFrame {
    timestamps: Vec<DateTime<Utc>>,
    point: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl ForecastFrame {
    /// Assemble a frame, validating lengths, ordering and interval bounds.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        point: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self> {
        let expected = timestamps.len();
        for got in [point.len(), lower.len(), upper.len()] {
            if got != expected {
                return Err(EtError::ShapeMismatch { expected, got });
            }
        }

        for pair in timestamps.windows(2) {
            if pair[1] <= pair[0] {
                return Err(EtError::TimestampError(format!(
                    "forecast timestamps must be strictly increasing, found {} after {}",
                    pair[1], pair[0]
                )));
            }
        }

        for i in 0..expected {
            if !(lower[i] <= point[i] && point[i] <= upper[i]) {
                return Err(EtError::InvalidParameter(format!(
                    "interval bounds out of order at index {i}: \
                     lower={}, point={}, upper={}",
                    lower[i], point[i], upper[i]
                )));
            }
        }

        Ok(Self {
            timestamps,
            point,
            lower,
            upper,
        })
    }

    /// Number of rows in the frame.
    pub fn len(&self) -> usize {
        self.point.len()
    }

    /// Whether the frame holds no rows.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// The shared time axis.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Point predictions.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Lower interval bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper interval bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Point predictions over the last `horizon` rows.
    ///
    /// For a frame that includes fitted history this is the future segment.
    pub fn tail_points(&self, horizon: usize) -> &[f64] {
        let start = self.len().saturating_sub(horizon);
        &self.point[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, TimeZone};

    fn monthly_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| base.checked_add_months(Months::new(i as u32)).unwrap())
            .collect()
    }

    #[test]
    fn valid_frame() {
        let frame = ForecastFrame::new(
            monthly_timestamps(3),
            vec![2.0, 3.0, 4.0],
            vec![1.0, 2.0, 3.0],
            vec![3.0, 4.0, 5.0],
        )
        .unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.tail_points(2), &[3.0, 4.0]);
    }

    #[test]
    fn column_length_mismatch_rejected() {
        let result = ForecastFrame::new(
            monthly_timestamps(3),
            vec![2.0, 3.0],
            vec![1.0, 2.0, 3.0],
            vec![3.0, 4.0, 5.0],
        );
        assert!(matches!(
            result,
            Err(EtError::ShapeMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn crossed_interval_rejected() {
        let result = ForecastFrame::new(
            monthly_timestamps(2),
            vec![2.0, 3.0],
            vec![1.0, 4.0],
            vec![3.0, 5.0],
        );
        assert!(matches!(result, Err(EtError::InvalidParameter(_))));
    }

    #[test]
    fn degenerate_interval_allowed() {
        let frame = ForecastFrame::new(
            monthly_timestamps(1),
            vec![2.0],
            vec![2.0],
            vec![2.0],
        );
        assert!(frame.is_ok());
    }

    #[test]
    fn empty_frame_allowed() {
        let frame = ForecastFrame::new(vec![], vec![], vec![], vec![]).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.tail_points(5), &[] as &[f64]);
    }
}
