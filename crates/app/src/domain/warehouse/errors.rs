//! Warehouse service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use stockroom::ledger::InsufficientStock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseServiceError {
    #[error("variant not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("a stock movement needs an actor")]
    MissingActor,

    #[error("a stock movement needs at least one item")]
    EmptyMovement,

    #[error("movement quantities must be greater than zero")]
    ZeroQuantity,

    #[error(transparent)]
    InsufficientStock(#[from] InsufficientStock),

    #[error("invalid quantity value")]
    InvalidQuantity(#[from] TryFromIntError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for WarehouseServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
