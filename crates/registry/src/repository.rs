use crate::error::RegistryError;
use chrono::NaiveDate;
use core_types::Dataset;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Listing metadata for a registered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub id: String,
    pub description: String,
    pub parameters: Vec<String>,
    pub records: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl From<&Dataset> for DatasetInfo {
    fn from(dataset: &Dataset) -> Self {
        Self {
            id: dataset.id().to_string(),
            description: dataset.description().to_string(),
            parameters: dataset.schema().parameters().to_vec(),
            records: dataset.records().len(),
            first_date: dataset.first_date(),
            last_date: dataset.last_date(),
        }
    }
}

/// Storage for named datasets.
///
/// Implementations must be safe to share across request handlers.
pub trait DatasetRepository: Send + Sync {
    /// Metadata for every dataset, ordered by id.
    fn list(&self) -> Result<Vec<DatasetInfo>, RegistryError>;

    /// An immutable snapshot of the dataset with the given id.
    fn get(&self, id: &str) -> Result<Arc<Dataset>, RegistryError>;

    /// Registers a dataset, replacing any existing one with the same id.
    /// Returns `true` if an existing dataset was replaced.
    fn insert(&self, dataset: Dataset) -> Result<bool, RegistryError>;

    /// Removes a dataset.
    fn remove(&self, id: &str) -> Result<(), RegistryError>;
}

/// A process-local `DatasetRepository`.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    datasets: RwLock<BTreeMap<String, Arc<Dataset>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository pre-populated with `datasets`.
    pub fn with_datasets(datasets: impl IntoIterator<Item = Dataset>) -> Self {
        let map = datasets
            .into_iter()
            .map(|d| (d.id().to_string(), Arc::new(d)))
            .collect();
        Self {
            datasets: RwLock::new(map),
        }
    }
}

impl DatasetRepository for InMemoryRepository {
    fn list(&self) -> Result<Vec<DatasetInfo>, RegistryError> {
        let datasets = self.datasets.read().map_err(|_| RegistryError::Unavailable)?;
        Ok(datasets.values().map(|d| DatasetInfo::from(d.as_ref())).collect())
    }

    fn get(&self, id: &str) -> Result<Arc<Dataset>, RegistryError> {
        let datasets = self.datasets.read().map_err(|_| RegistryError::Unavailable)?;
        datasets
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::DatasetNotFound(id.to_string()))
    }

    fn insert(&self, dataset: Dataset) -> Result<bool, RegistryError> {
        let mut datasets = self.datasets.write().map_err(|_| RegistryError::Unavailable)?;
        let id = dataset.id().to_string();
        let replaced = datasets.insert(id.clone(), Arc::new(dataset)).is_some();
        tracing::info!(dataset = %id, replaced, "Registered dataset.");
        Ok(replaced)
    }

    fn remove(&self, id: &str) -> Result<(), RegistryError> {
        let mut datasets = self.datasets.write().map_err(|_| RegistryError::Unavailable)?;
        datasets
            .remove(id)
            .map(|_| tracing::info!(dataset = %id, "Removed dataset."))
            .ok_or_else(|| RegistryError::DatasetNotFound(id.to_string()))
    }
}
