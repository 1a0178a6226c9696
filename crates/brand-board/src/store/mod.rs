//! Datastore seam shared by every repository trait.

pub mod memory;

pub use memory::{MemoryImageStore, MemoryStore};

use crate::error::ApiError;

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(message) => ApiError::Validation(message),
            RepositoryError::NotFound => ApiError::not_found("record not found"),
            RepositoryError::Unavailable(_) => ApiError::dependency(value),
        }
    }
}
