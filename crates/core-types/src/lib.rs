//! # Trendline Core Types
//!
//! The shared vocabulary of the workspace: dated records, dataset schemas and
//! the inclusive date range used to slice them. Every other crate depends on
//! this one; it depends on nothing but `serde`, `chrono` and `thiserror`.

pub mod error;
pub mod range;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use range::DateRange;
pub use structs::{Dataset, DatasetSchema, DatedRecord, ParameterId};
