use thiserror::Error;

/// Failure of a single external calendar account fetch.
///
/// These are caught at the aggregator boundary, logged, and that account's
/// contribution is dropped; they never abort the overall query.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("quota exceeded: {0}")]
    Quota(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("calendar not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Calendar provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("No assignable host: {0}")]
    AssignmentImpossible(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
