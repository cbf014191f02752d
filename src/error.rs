//! Error types for the forecasting dashboard.

use thiserror::Error;

/// Errors that can occur while loading data, fitting models or assembling output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EtError {
    /// A remote resource could not be fetched.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// A fetched series could not be parsed into a usable time series.
    #[error("Malformed series: {0}")]
    MalformedSeries(String),

    /// A model could not be fitted to the training window.
    #[error("Fit failure in {model}: {reason}")]
    FitFailure { model: &'static str, reason: String },

    /// Not enough observations for the requested operation.
    #[error("Insufficient data: needed {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Frames that must agree in length do not.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Timestamps are unordered, duplicated or disagree between frames.
    #[error("Timestamp error: {0}")]
    TimestampError(String),

    /// An invalid parameter was supplied.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A prediction was requested before the model was fitted.
    #[error("Model must be fitted before making predictions")]
    FitRequired,
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, EtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EtError::InsufficientData { needed: 10, got: 5 };
        assert_eq!(err.to_string(), "Insufficient data: needed 10, got 5");

        let err = EtError::ShapeMismatch {
            expected: 48,
            got: 47,
        };
        assert!(err.to_string().contains("48"));
        assert!(err.to_string().contains("47"));
    }

    #[test]
    fn error_is_cloneable() {
        let err = EtError::DataUnavailable("timeout".into());
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
