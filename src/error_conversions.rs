//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so
//! conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::Decode(val.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Validation(message) => ServiceError::Validation(message),
            RepositoryError::Network(message) | RepositoryError::Decode(message) => {
                ServiceError::Network(message)
            }
            RepositoryError::Config(message) => {
                log::error!("Catalog client misconfigured: {message}");
                ServiceError::Internal
            }
        }
    }
}
