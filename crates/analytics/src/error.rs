use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("No data available in the requested range")]
    NoData,

    #[error("Moving average window must be at least 1, got {0}")]
    InvalidWindow(usize),

    #[error("Series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}
