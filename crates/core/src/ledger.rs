//! Stock Ledger Rules

use std::{fmt, num::TryFromIntError, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a warehouse movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Inbound stock entry: goods received into the warehouse.
    Entry,

    /// Outbound stock issue: goods leaving the warehouse.
    Issue,
}

impl MovementKind {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Issue => "issue",
        }
    }

    /// Signed ledger delta for moving `quantity` units in this direction.
    ///
    /// # Errors
    ///
    /// Returns an error when `quantity` does not fit in an `i64`.
    pub fn delta(self, quantity: u64) -> Result<i64, TryFromIntError> {
        let quantity = i64::try_from(quantity)?;

        Ok(match self {
            Self::Entry => quantity,
            Self::Issue => -quantity,
        })
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown movement kind string.
#[derive(Debug, Error)]
#[error("unknown movement kind: {0}")]
pub struct UnknownMovementKind(pub String);

impl FromStr for MovementKind {
    type Err = UnknownMovementKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(Self::Entry),
            "issue" => Ok(Self::Issue),
            other => Err(UnknownMovementKind(other.to_string())),
        }
    }
}

/// A variant does not hold enough stock for the requested movement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("insufficient stock for {sku}: {available} available, {requested} requested")]
pub struct InsufficientStock {
    /// SKU of the variant that came up short.
    pub sku: String,

    /// Units on hand at the time of the check.
    pub available: u64,

    /// Units the movement needed.
    pub requested: u64,
}

/// Check that `available` units cover `requested`.
///
/// # Errors
///
/// Returns [`InsufficientStock`] when the variant cannot supply the quantity.
pub fn ensure_available(sku: &str, available: u64, requested: u64) -> Result<(), InsufficientStock> {
    if available < requested {
        return Err(InsufficientStock {
            sku: sku.to_string(),
            available,
            requested,
        });
    }

    Ok(())
}
