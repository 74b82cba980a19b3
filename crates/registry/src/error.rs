use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Dataset '{0}' not found")]
    DatasetNotFound(String),

    #[error("Invalid dataset payload: {0}")]
    InvalidPayload(String),

    #[error("The dataset registry is unavailable.")]
    Unavailable,
}

impl From<core_types::CoreError> for RegistryError {
    fn from(err: core_types::CoreError) -> Self {
        RegistryError::InvalidPayload(err.to_string())
    }
}
