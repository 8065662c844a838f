//! Stock Movement Records

use jiff::Timestamp;
use serde::Serialize;
use stockroom::ledger::MovementKind;

use crate::{domain::variants::records::VariantUuid, uuids::TypedUuid};

/// Stock Movement UUID
pub type StockMovementUuid = TypedUuid<StockMovementRecord>;

/// A stock entry or stock issue with the stock level each item left behind.
#[derive(Debug, Clone, Serialize)]
pub struct StockMovementRecord {
    pub uuid: StockMovementUuid,
    pub kind: MovementKind,
    pub actor: String,
    pub reference: Option<String>,
    pub created_at: Timestamp,
    pub items: Vec<StockMovementItemRecord>,
}

/// One variant moved by a stock movement.
#[derive(Debug, Clone, Serialize)]
pub struct StockMovementItemRecord {
    pub variant_uuid: VariantUuid,
    pub sku: String,
    pub quantity: u64,
    pub stock_after: u64,
}

/// A movement as seen from one variant's audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct VariantMovementRecord {
    pub movement_uuid: StockMovementUuid,
    pub kind: MovementKind,
    pub actor: String,
    pub reference: Option<String>,
    pub quantity: u64,
    pub stock_after: u64,
    pub created_at: Timestamp,
}
