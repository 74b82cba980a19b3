//! # Trendline Dataset Registry
//!
//! This crate owns the collection of named datasets the service answers
//! queries about.
//!
//! ## Architectural Principles
//!
//! - **Injected, not global:** Consumers depend on the `DatasetRepository`
//!   trait and receive an implementation at startup. Tests build their own.
//! - **Snapshots:** Readers get an `Arc<Dataset>`; a replacement upload swaps
//!   the entry without disturbing queries already holding the old snapshot.
//! - **No persistence:** `InMemoryRepository` lives for the process lifetime.
//!
//! ## Public API
//!
//! - `DatasetRepository`, `InMemoryRepository`: storage.
//! - `DatasetUpload`: the JSON registration payload and its validation.
//! - `synthetic`: deterministic generated datasets used for seeding.
//! - `RegistryError`: the specific error types returned from this crate.

pub mod error;
pub mod repository;
pub mod synthetic;
pub mod upload;

pub use error::RegistryError;
pub use repository::{DatasetInfo, DatasetRepository, InMemoryRepository};
pub use upload::{DatasetUpload, RecordUpload};
