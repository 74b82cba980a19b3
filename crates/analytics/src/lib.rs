//! # Trendline Analytics Engine
//!
//! This crate turns an ordered sequence of dated observations into derived
//! series (moving averages), scalar summaries and bivariate relationships.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O, no shared state. It depends only on `core-types`.
//! - **Stateless Calculation:** The `AnalyticsEngine` takes an immutable dataset
//!   snapshot and returns plain report structs. Empty input is reported as
//!   `AnalyticsError::NoData`, never as NaN or a panic.
//! - **Full Precision:** Rounding for display is left to the caller (`round_to`).
//!
//! ## Public API
//!
//! - `filter_by_date`, `extract`, `present`: slicing a dataset into a numeric series.
//! - `describe`, `count_anomalies`: descriptive statistics.
//! - `moving_average`: trailing simple moving average.
//! - `pearson`, `Interpretation`: correlation and its qualitative label.
//! - `AnalyticsEngine`: the facade combining the above per dataset.

pub mod correlation;
pub mod descriptive;
pub mod engine;
pub mod error;
pub mod format;
pub mod moving_average;
pub mod report;
mod scale;
pub mod series;

// Re-export the key components to create a clean, public-facing API.
pub use correlation::{Interpretation, pearson};
pub use descriptive::{Descriptive, count_anomalies, describe};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use format::round_to;
pub use moving_average::moving_average;
pub use report::{CorrelationReport, SummaryReport, TrendPoint};
pub use series::{extract, filter_by_date, present};
