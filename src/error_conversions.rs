//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so
//! the conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::forms::FormErrors;
    use crate::services::ServiceError;

    impl From<FormErrors> for ServiceError {
        fn from(val: FormErrors) -> Self {
            ServiceError::Form(val)
        }
    }
}
