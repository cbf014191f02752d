//! Positional-median ensemble of exactly three forecast frames.

use crate::core::ForecastFrame;
use crate::error::{EtError, Result};

/// Combine three forecast frames by taking the positional median of the
/// point, lower and upper columns at every row.
///
/// The frames must agree exactly in length and time axis; disagreement
/// is an error, never silently truncated. The median of three is the
/// middle value, so the result is invariant under frame order.
pub fn combine(frames: &[ForecastFrame; 3]) -> Result<ForecastFrame> {
    let expected = frames[0].len();
    for frame in &frames[1..] {
        if frame.len() != expected {
            return Err(EtError::ShapeMismatch {
                expected,
                got: frame.len(),
            });
        }
        if frame.timestamps() != frames[0].timestamps() {
            return Err(EtError::TimestampError(
                "ensemble inputs disagree on the time axis".into(),
            ));
        }
    }

    let mut point = Vec::with_capacity(expected);
    let mut lower = Vec::with_capacity(expected);
    let mut upper = Vec::with_capacity(expected);
    for i in 0..expected {
        point.push(median3(
            frames[0].point()[i],
            frames[1].point()[i],
            frames[2].point()[i],
        ));
        lower.push(median3(
            frames[0].lower()[i],
            frames[1].lower()[i],
            frames[2].lower()[i],
        ));
        upper.push(median3(
            frames[0].upper()[i],
            frames[1].upper()[i],
            frames[2].upper()[i],
        ));
    }

    ForecastFrame::new(frames[0].timestamps().to_vec(), point, lower, upper)
}

/// Middle value of three. Never an average.
fn median3(a: f64, b: f64, c: f64) -> f64 {
    a.max(b).min(a.max(c)).min(b.max(c))
}
