use crate::correlation::Interpretation;
use crate::format::round_to;
use chrono::NaiveDate;
use serde::Serialize;

/// Descriptive summary of one parameter over a date range.
///
/// This is the output of `AnalyticsEngine::summary` and the body the web layer
/// serializes (after rounding) for the summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    /// Number of present (non-absent) values the statistics were computed over.
    pub count: usize,
    /// Values more than two standard deviations from the mean.
    pub anomalies: usize,
}

impl SummaryReport {
    /// Returns a copy with every floating-point field rounded to `digits`.
    pub fn rounded(&self, digits: u32) -> Self {
        Self {
            mean: round_to(self.mean, digits),
            median: round_to(self.median, digits),
            stddev: round_to(self.stddev, digits),
            min: round_to(self.min, digits),
            max: round_to(self.max, digits),
            ..self.clone()
        }
    }

    /// A one-line, human-readable description of the summary.
    pub fn insight(&self, parameter: &str, digits: u32) -> String {
        let r = self.rounded(digits);
        format!(
            "{parameter} averaged {} (median {}) over {} observations, ranging from {} to {} \
             with a standard deviation of {}; {} anomalous readings detected.",
            r.mean, r.median, r.count, r.min, r.max, r.stddev, r.anomalies
        )
    }
}

/// One point of a trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
    /// `None` only when the trailing window holds no present value.
    pub moving_average: Option<f64>,
}

impl TrendPoint {
    pub fn rounded(&self, digits: u32) -> Self {
        Self {
            date: self.date,
            value: self.value.map(|v| round_to(v, digits)),
            moving_average: self.moving_average.map(|v| round_to(v, digits)),
        }
    }
}

/// Correlation between two parameters of the same dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub r: f64,
    pub interpretation: Interpretation,
    /// Number of dates on which both parameters were present.
    pub count: usize,
}

impl CorrelationReport {
    pub fn rounded(&self, digits: u32) -> Self {
        Self {
            r: round_to(self.r, digits),
            ..self.clone()
        }
    }
}
