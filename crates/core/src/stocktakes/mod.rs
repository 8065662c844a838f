//! Stocktakes
//!
//! A stocktake is either an in-memory [`StocktakeDraft`] being counted, or a
//! [`CompletedStocktake`] that has been reconciled into the ledger. Drafts are
//! never persisted: refreshing a counting session loses it, which keeps
//! half-finished counts out of the audit history.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

mod completed;
mod draft;
mod line;

pub use completed::CompletedStocktake;
pub use draft::StocktakeDraft;
pub use line::StocktakeLine;

/// Prefix of stocktake codes.
pub const STOCKTAKE_CODE_PREFIX: &str = "ST";

/// Which variants a stocktake counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum StocktakeScope {
    /// Every active variant.
    All,

    /// Active variants of one product.
    Product(Uuid),
}

impl fmt::Display for StocktakeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Product(product) => write!(f, "product:{product}"),
        }
    }
}

impl From<StocktakeScope> for String {
    fn from(scope: StocktakeScope) -> Self {
        scope.to_string()
    }
}

/// Unparseable stocktake scope string.
#[derive(Debug, Error)]
#[error("invalid stocktake scope: {0}")]
pub struct InvalidScope(
    /// Rejected input.
    pub String,
);

impl FromStr for StocktakeScope {
    type Err = InvalidScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }

        s.strip_prefix("product:")
            .and_then(|product| Uuid::parse_str(product).ok())
            .map(Self::Product)
            .ok_or_else(|| InvalidScope(s.to_string()))
    }
}

/// Lifecycle status of a stocktake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StocktakeStatus {
    /// Counting in progress, held in memory only.
    Draft,

    /// Reconciled and immutable.
    Completed,
}

impl StocktakeStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for StocktakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stocktake rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StocktakeError {
    /// A stocktake needs a named auditor.
    #[error("auditor name is required")]
    MissingAuditor,

    /// The variant is not part of this stocktake.
    #[error("variant {0} is not part of this stocktake")]
    UnknownLine(Uuid),

    /// No line carries this SKU.
    #[error("SKU {0} is not part of this stocktake")]
    UnknownSku(String),

    /// Physical counts cannot be negative.
    #[error("count for {sku} cannot be negative (got {count})")]
    NegativeCount {
        /// Offending SKU.
        sku: String,

        /// Submitted count.
        count: i64,
    },

    /// Completed stocktakes are immutable.
    #[error("stocktake {0} is already completed")]
    AlreadyCompleted(String),
}

/// A stocktake in either of its two states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Stocktake {
    /// Counting in progress.
    Draft(StocktakeDraft),

    /// Reconciled.
    Completed(CompletedStocktake),
}

impl Stocktake {
    /// Current status.
    #[must_use]
    pub const fn status(&self) -> StocktakeStatus {
        match self {
            Self::Draft(_) => StocktakeStatus::Draft,
            Self::Completed(_) => StocktakeStatus::Completed,
        }
    }

    /// Counted lines.
    #[must_use]
    pub fn lines(&self) -> &[StocktakeLine] {
        match self {
            Self::Draft(draft) => draft.lines(),
            Self::Completed(completed) => completed.lines(),
        }
    }

    /// Sum of all line discrepancies.
    #[must_use]
    pub fn total_discrepancy(&self) -> i64 {
        match self {
            Self::Draft(draft) => draft.total_discrepancy(),
            Self::Completed(completed) => completed.total_discrepancy(),
        }
    }

    /// Auditor responsible for the count.
    #[must_use]
    pub fn auditor_name(&self) -> &str {
        match self {
            Self::Draft(draft) => draft.auditor_name(),
            Self::Completed(completed) => completed.auditor_name(),
        }
    }

    /// Record a physical count.
    ///
    /// # Errors
    ///
    /// Returns [`StocktakeError::AlreadyCompleted`] for completed stocktakes and
    /// [`StocktakeError::UnknownLine`] when the variant is not counted.
    pub fn edit_line(&mut self, variant: Uuid, actual_stock: u64) -> Result<&StocktakeLine, StocktakeError> {
        match self {
            Self::Draft(draft) => draft.edit_line(variant, actual_stock),
            Self::Completed(completed) => {
                Err(StocktakeError::AlreadyCompleted(completed.code().to_string()))
            }
        }
    }
}

impl From<StocktakeDraft> for Stocktake {
    fn from(draft: StocktakeDraft) -> Self {
        Self::Draft(draft)
    }
}

impl From<CompletedStocktake> for Stocktake {
    fn from(completed: CompletedStocktake) -> Self {
        Self::Completed(completed)
    }
}

pub(crate) fn sum_discrepancies<'a, I>(lines: I) -> i64
where
    I: IntoIterator<Item = &'a StocktakeLine>,
{
    lines
        .into_iter()
        .map(StocktakeLine::discrepancy)
        .fold(0_i64, i64::saturating_add)
}
