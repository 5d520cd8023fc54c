use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Submitted data was rejected, locally or by the catalog.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The catalog could not be reached or answered unexpectedly.
    #[error("catalog unavailable: {0}")]
    Network(String),
    /// An update for the same product is still outstanding.
    #[error("an update for this product is already in progress")]
    Conflict,
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
