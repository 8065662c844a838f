//! Stocktakes service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use stockroom::stocktakes::StocktakeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StocktakesServiceError {
    #[error("stocktake already exists")]
    AlreadyExists,

    #[error("stocktake not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("confirming a stocktake needs an actor")]
    MissingActor,

    #[error(transparent)]
    Stocktake(#[from] StocktakeError),

    /// The variant was archived or deleted while counting.
    #[error("variant {sku} is no longer active")]
    VariantUnavailable { sku: String },

    #[error("invalid quantity value")]
    InvalidQuantity(#[from] TryFromIntError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StocktakesServiceError {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            StocktakesServiceError::from(Error::RowNotFound),
            StocktakesServiceError::NotFound
        ));
    }

    #[test]
    fn unavailable_variant_names_the_sku() {
        let error = StocktakesServiceError::VariantUnavailable {
            sku: "TEE-RED-M-001".to_string(),
        };

        assert_eq!(error.to_string(), "variant TEE-RED-M-001 is no longer active");
    }
}
