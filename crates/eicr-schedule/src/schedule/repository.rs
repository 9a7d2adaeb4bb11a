use super::domain::{Circuit, CircuitId};

/// Storage abstraction for the circuit collection so the service module can
/// be exercised in isolation. `version` must increase on every successful
/// write; derived reports are memoized against it.
pub trait CircuitRepository: Send + Sync {
    fn insert(&self, circuit: Circuit) -> Result<Circuit, RepositoryError>;
    fn update(&self, circuit: Circuit) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CircuitId) -> Result<Option<Circuit>, RepositoryError>;
    fn remove(&self, id: &CircuitId) -> Result<(), RepositoryError>;
    /// All circuits in stable insertion order; issue reporting depends on it.
    fn list(&self) -> Result<Vec<Circuit>, RepositoryError>;
    fn version(&self) -> u64;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("circuit already exists")]
    Conflict,
    #[error("circuit not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
