//! Stocktake Drafts

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::Serialize;
use uuid::Uuid;

use super::{CompletedStocktake, StocktakeError, StocktakeLine, StocktakeScope, sum_discrepancies};

/// A counting session in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StocktakeDraft {
    id: Uuid,
    auditor_name: String,
    scope: StocktakeScope,
    started_at: Timestamp,
    lines: Vec<StocktakeLine>,
}

impl StocktakeDraft {
    /// Start counting from a snapshot of the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`StocktakeError::MissingAuditor`] when `auditor_name` is blank.
    pub fn start<I>(
        auditor_name: &str,
        scope: StocktakeScope,
        started_at: Timestamp,
        lines: I,
    ) -> Result<Self, StocktakeError>
    where
        I: IntoIterator<Item = StocktakeLine>,
    {
        Self::resume(Uuid::now_v7(), auditor_name, scope, started_at, lines)
    }

    /// Rebuild a draft handed out earlier, e.g. from a count sheet, keeping its
    /// id and the snapshot its lines were counted against.
    ///
    /// # Errors
    ///
    /// Returns [`StocktakeError::MissingAuditor`] when `auditor_name` is blank.
    pub fn resume<I>(
        id: Uuid,
        auditor_name: &str,
        scope: StocktakeScope,
        started_at: Timestamp,
        lines: I,
    ) -> Result<Self, StocktakeError>
    where
        I: IntoIterator<Item = StocktakeLine>,
    {
        let auditor_name = auditor_name.trim();

        if auditor_name.is_empty() {
            return Err(StocktakeError::MissingAuditor);
        }

        Ok(Self {
            id,
            auditor_name: auditor_name.to_string(),
            scope,
            started_at,
            lines: lines.into_iter().collect(),
        })
    }

    /// Synthetic id, only used to stop the same draft being committed twice.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Auditor responsible for the count.
    #[must_use]
    pub fn auditor_name(&self) -> &str {
        &self.auditor_name
    }

    /// Counted variants.
    #[must_use]
    pub const fn scope(&self) -> StocktakeScope {
        self.scope
    }

    /// When the ledger snapshot was taken.
    #[must_use]
    pub const fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Lines in snapshot order.
    #[must_use]
    pub fn lines(&self) -> &[StocktakeLine] {
        &self.lines
    }

    /// Sum of all line discrepancies.
    #[must_use]
    pub fn total_discrepancy(&self) -> i64 {
        sum_discrepancies(&self.lines)
    }

    /// Replace the physical count of one line.
    ///
    /// # Errors
    ///
    /// Returns [`StocktakeError::UnknownLine`] when `variant` is not counted.
    pub fn edit_line(&mut self, variant: Uuid, actual_stock: u64) -> Result<&StocktakeLine, StocktakeError> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.variant() == variant)
            .ok_or(StocktakeError::UnknownLine(variant))?;

        line.set_actual_stock(actual_stock);

        Ok(line)
    }

    /// Apply a batch of counts keyed by SKU.
    ///
    /// Every count is checked before any line changes, so a bad entry leaves the
    /// draft untouched. Returns the number of lines whose count changed.
    ///
    /// # Errors
    ///
    /// Returns [`StocktakeError::UnknownSku`] or [`StocktakeError::NegativeCount`]
    /// for the first offending entry.
    pub fn apply_counts<'c, I>(&mut self, counts: I) -> Result<usize, StocktakeError>
    where
        I: IntoIterator<Item = (&'c str, i64)>,
    {
        let positions: FxHashMap<&str, usize> = self
            .lines
            .iter()
            .enumerate()
            .map(|(position, line)| (line.sku(), position))
            .collect();

        let mut updates = Vec::new();

        for (sku, count) in counts {
            let position = *positions
                .get(sku)
                .ok_or_else(|| StocktakeError::UnknownSku(sku.to_string()))?;

            if count < 0 {
                return Err(StocktakeError::NegativeCount {
                    sku: sku.to_string(),
                    count,
                });
            }

            updates.push((position, count.unsigned_abs()));
        }

        let mut changed = 0;

        for (position, actual_stock) in updates {
            if let Some(line) = self.lines.get_mut(position)
                && line.actual_stock() != actual_stock
            {
                line.set_actual_stock(actual_stock);
                changed += 1;
            }
        }

        Ok(changed)
    }

    /// Finalise the count. Consuming the draft means it cannot be completed twice.
    #[must_use]
    pub fn complete(self, code: String, completed_by: String, completed_at: Timestamp) -> CompletedStocktake {
        CompletedStocktake::new(
            self.id,
            code,
            self.auditor_name,
            completed_by,
            self.scope,
            completed_at,
            self.lines,
        )
    }
}
