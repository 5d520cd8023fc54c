use thiserror::Error;

/// Failures of the remote catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Transport failure, timeout or unexpected HTTP status.
    #[error("network error: {0}")]
    Network(String),
    /// The requested identifier does not resolve.
    #[error("not found")]
    NotFound,
    /// The catalog rejected the submitted payload.
    #[error("validation error: {0}")]
    Validation(String),
    /// The catalog answered with a body that could not be decoded.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The client could not be constructed from its configuration.
    #[error("invalid catalog configuration: {0}")]
    Config(String),
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<reqwest::Error> for RepositoryError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Network(value.to_string())
        }
    }
}
