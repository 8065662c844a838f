//! Return Requests Data

use stockroom::returns::{ReturnKind, ReturnStatus, Settlement};

use crate::domain::orders::records::OrderItemUuid;

/// New Return Request Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReturnRequest {
    pub order_item: OrderItemUuid,
    pub kind: ReturnKind,
    pub reason: String,
    pub evidence_images: Vec<String>,
}

/// Columns written alongside a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusChange<'a> {
    pub to: ReturnStatus,
    pub actor: &'a str,
    pub notes: Option<&'a str>,
    pub rejection_reason: Option<&'a str>,
    pub settlement: Option<Settlement>,
}
