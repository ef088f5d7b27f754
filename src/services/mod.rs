pub mod access;
pub mod department_service;
pub mod grievance_service;
pub mod user_service;

pub use department_service::DepartmentService;
pub use grievance_service::{CreateGrievance, GrievanceService, UpdateGrievance, UpdateOutcome};
pub use user_service::UserService;

use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::filter::FilterError;
use crate::storage::StorageError;

/// Failure taxonomy shared by the service layer
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid '{field}': {message}")]
    Validation { field: &'static str, message: String },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            ServiceError::Validation { field, message } => ApiError::invalid_field(field, message),
            ServiceError::Filter(e) => e.into(),
            ServiceError::Storage(e) => e.into(),
            ServiceError::Database(e) => e.into(),
        }
    }
}
