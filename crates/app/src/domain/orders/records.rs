//! Order Records

use serde::Serialize;
use stockroom::returns::PurchasedLine;

use crate::{
    domain::{products::records::ProductUuid, variants::records::VariantUuid},
    uuids::TypedUuid,
};

/// Order Record
pub struct OrderRecord;

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// One purchased line of an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
    pub unit_price: u64,
    pub size: String,
    pub color: String,
}

impl OrderItemRecord {
    /// The line as seen by return validation.
    #[must_use]
    pub fn purchased_line(&self) -> PurchasedLine<'_> {
        PurchasedLine {
            size: &self.size,
            color: &self.color,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}
