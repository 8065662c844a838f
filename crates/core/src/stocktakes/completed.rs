//! Completed Stocktakes

use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

use super::{StocktakeLine, StocktakeScope, sum_discrepancies};

/// A reconciled stocktake. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedStocktake {
    draft_id: Uuid,
    code: String,
    auditor_name: String,
    completed_by: String,
    scope: StocktakeScope,
    completed_at: Timestamp,
    lines: Vec<StocktakeLine>,
    total_discrepancy: i64,
}

impl CompletedStocktake {
    /// Rebuild a completed stocktake, e.g. from history. The total is recomputed
    /// from `lines`.
    #[must_use]
    pub fn new(
        draft_id: Uuid,
        code: String,
        auditor_name: String,
        completed_by: String,
        scope: StocktakeScope,
        completed_at: Timestamp,
        lines: Vec<StocktakeLine>,
    ) -> Self {
        let total_discrepancy = sum_discrepancies(&lines);

        Self {
            draft_id,
            code,
            auditor_name,
            completed_by,
            scope,
            completed_at,
            lines,
            total_discrepancy,
        }
    }

    /// Id of the draft this was completed from.
    #[must_use]
    pub const fn draft_id(&self) -> Uuid {
        self.draft_id
    }

    /// Document code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Auditor who counted.
    #[must_use]
    pub fn auditor_name(&self) -> &str {
        &self.auditor_name
    }

    /// Staff member who confirmed the balance.
    #[must_use]
    pub fn completed_by(&self) -> &str {
        &self.completed_by
    }

    /// Counted variants.
    #[must_use]
    pub const fn scope(&self) -> StocktakeScope {
        self.scope
    }

    /// Stocktake date.
    #[must_use]
    pub const fn completed_at(&self) -> Timestamp {
        self.completed_at
    }

    /// Final lines.
    #[must_use]
    pub fn lines(&self) -> &[StocktakeLine] {
        &self.lines
    }

    /// Sum of all line discrepancies.
    #[must_use]
    pub const fn total_discrepancy(&self) -> i64 {
        self.total_discrepancy
    }

    /// Lines where the shelf disagreed with the ledger.
    pub fn discrepant_lines(&self) -> impl Iterator<Item = &StocktakeLine> {
        self.lines.iter().filter(|line| line.discrepancy() != 0)
    }
}
