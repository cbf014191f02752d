//! Train/test split planning from the dashboard's two sliders.

use crate::error::{EtError, Result};

/// Lower bound on the months kept for training.
pub const MIN_KEEP: usize = 10;
/// Bounds on the extra months forecast past the end of the series.
pub const MIN_EXTRA: usize = 12;
pub const MAX_EXTRA: usize = 60;

/// A resolved split of a series into training window, held-out tail and
/// forecast horizon.
///
/// The percent split drives backtesting over the full series; the
/// keep/extra split drives the live forecast. The two are independent
/// views of the same slider state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPlan {
    /// Total observations available.
    pub len: usize,
    /// Months kept for training, counted from the start.
    pub keep: usize,
    /// Months forecast past the end of the series.
    pub extra: usize,
    /// Training share of the series, truncated to a whole percent.
    pub train_percent: u8,
    /// Complement of `train_percent`.
    pub test_percent: u8,
    /// Forecast horizon: the held-out tail plus the extra months.
    pub horizon: usize,
}

impl SplitPlan {
    /// Plan a split for a series of `len` observations.
    ///
    /// `keep` must lie in `[MIN_KEEP, len]` and `extra` in
    /// `[MIN_EXTRA, MAX_EXTRA]`.
    pub fn plan(len: usize, keep: usize, extra: usize) -> Result<Self> {
        if len < MIN_KEEP {
            return Err(EtError::InsufficientData {
                needed: MIN_KEEP,
                got: len,
            });
        }
        if keep < MIN_KEEP || keep > len {
            return Err(EtError::InvalidParameter(format!(
                "keep must be between {MIN_KEEP} and {len}, got {keep}"
            )));
        }
        if !(MIN_EXTRA..=MAX_EXTRA).contains(&extra) {
            return Err(EtError::InvalidParameter(format!(
                "extra months must be between {MIN_EXTRA} and {MAX_EXTRA}, got {extra}"
            )));
        }

        // Whole-percent truncation, so e.g. 100/120 becomes 83 not 84.
        let train_percent = (100 * keep / len) as u8;

        Ok(Self {
            len,
            keep,
            extra,
            train_percent,
            test_percent: 100 - train_percent,
            horizon: len - keep + extra,
        })
    }

    /// Default slider position for the kept months.
    pub fn default_keep(len: usize) -> usize {
        (MIN_KEEP + len) / 2
    }

    /// Default slider position for the extra months.
    pub fn default_extra() -> usize {
        36
    }

    /// Observations in the backtest training partition.
    pub fn backtest_train_len(&self) -> usize {
        self.len * self.train_percent as usize / 100
    }

    /// Observations in the backtest test partition.
    pub fn backtest_test_len(&self) -> usize {
        self.len - self.backtest_train_len()
    }
}
