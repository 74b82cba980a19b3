use crate::error::AnalyticsError;
use crate::scale::{scale_of, scaled_mean};
use serde::Serialize;

/// Number of standard deviations from the mean beyond which a value is anomalous.
pub const ANOMALY_SIGMA: f64 = 2.0;

/// Descriptive statistics over a non-empty series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Descriptive {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (denominator N).
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Computes mean, median, population standard deviation, min and max.
///
/// Every output is finite for any non-empty slice of finite values, including
/// magnitudes close to `f64::MAX`. Returns `AnalyticsError::NoData` for an
/// empty slice.
pub fn describe(values: &[f64]) -> Result<Descriptive, AnalyticsError> {
    if values.is_empty() {
        return Err(AnalyticsError::NoData);
    }

    let count = values.len();
    let n = count as f64;
    let scale = scale_of(values);
    let unit_mean = scaled_mean(values, scale).ok_or(AnalyticsError::NoData)?;
    let scaled_variance = values
        .iter()
        .map(|v| (v / scale - unit_mean).powi(2))
        .sum::<f64>()
        / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (min, max) = (sorted[0], sorted[count - 1]);
    let mid = count / 2;
    let median = if count % 2 == 0 {
        sorted[mid - 1].midpoint(sorted[mid])
    } else {
        sorted[mid]
    };

    Ok(Descriptive {
        mean: (unit_mean * scale).clamp(min, max),
        median,
        stddev: scaled_variance.sqrt() * scale,
        min,
        max,
        count,
    })
}

/// Counts values whose distance from `mean` is strictly greater than
/// `ANOMALY_SIGMA * stddev`.
pub fn count_anomalies(values: &[f64], mean: f64, stddev: f64) -> usize {
    // Both sides are halved so neither the distance nor the threshold can overflow.
    let threshold = ANOMALY_SIGMA / 2.0 * stddev;
    values
        .iter()
        .filter(|&&v| (v / 2.0 - mean / 2.0).abs() > threshold)
        .count()
}
