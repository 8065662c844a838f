//! Variants service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use stockroom::variants::generator::GenerationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VariantsServiceError {
    #[error("variant already exists")]
    AlreadyExists,

    #[error("variant not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for VariantsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
