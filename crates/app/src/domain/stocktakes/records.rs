//! Stocktake records

use jiff::Timestamp;
use serde::Serialize;
use stockroom::stocktakes::{CompletedStocktake, StocktakeScope};

use crate::uuids::TypedUuid;

pub type StocktakeUuid = TypedUuid<StocktakeRecord>;

/// A completed stocktake with all of its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StocktakeRecord {
    pub uuid: StocktakeUuid,
    pub started_at: Timestamp,
    pub stocktake: CompletedStocktake,
}

/// History row, without lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StocktakeSummaryRecord {
    pub uuid: StocktakeUuid,
    pub code: String,
    pub auditor_name: String,
    pub completed_by: String,
    pub scope: StocktakeScope,
    pub total_discrepancy: i64,
    pub line_count: u64,
    pub started_at: Timestamp,
    pub completed_at: Timestamp,
}
