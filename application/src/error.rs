//! Application error type

use crate::ports::proposal_repository::RepositoryError;
use agora_domain::DomainError;
use thiserror::Error;

/// Errors returned by the engine's use cases
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl EngineError {
    /// The domain error behind this failure, if any
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain(e) => Some(e),
            EngineError::Repository(_) => None,
        }
    }
}
