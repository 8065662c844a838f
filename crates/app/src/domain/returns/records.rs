//! Return Request Records

use jiff::Timestamp;
use serde::Serialize;
use stockroom::returns::{ReturnKind, ReturnStatus, Settlement};

use crate::{
    domain::orders::records::{OrderItemUuid, OrderUuid},
    uuids::TypedUuid,
};

/// Return Request UUID
pub type ReturnRequestUuid = TypedUuid<ReturnRequestRecord>;

/// A customer's request to exchange or refund one order line.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnRequestRecord {
    pub uuid: ReturnRequestUuid,
    pub request_code: String,
    pub order_uuid: OrderUuid,
    pub order_item_uuid: OrderItemUuid,
    pub kind: ReturnKind,
    pub status: ReturnStatus,
    pub reason: String,
    pub evidence_images: Vec<String>,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub settlement: Option<Settlement>,
    pub processed_by: Option<String>,
    pub processed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
