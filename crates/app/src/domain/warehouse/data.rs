//! Warehouse Data

use crate::domain::variants::records::VariantUuid;

/// New Stock Movement Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStockMovement {
    pub actor: String,
    pub reference: Option<String>,
    pub items: Vec<NewMovementItem>,
}

/// New Movement Item Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMovementItem {
    pub variant: VariantUuid,
    pub quantity: u64,
}
