//! Returns service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use stockroom::{
    ledger::InsufficientStock,
    returns::{InvalidTransition, ReturnValidationError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReturnsServiceError {
    #[error("an open return request already exists for this order item")]
    AlreadyExists,

    #[error("return request not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Validation(#[from] ReturnValidationError),

    #[error(transparent)]
    InvalidStateTransition(#[from] InvalidTransition),

    #[error("no active variant {color}/{size} to exchange for")]
    ExchangeTargetNotFound { size: String, color: String },

    #[error(transparent)]
    InsufficientStock(#[from] InsufficientStock),

    #[error("invalid quantity value")]
    InvalidQuantity(#[from] TryFromIntError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ReturnsServiceError {
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
