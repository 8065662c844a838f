//! Variant Records

use jiff::Timestamp;
use serde::Serialize;
use stockroom::variants::VariantStatus;

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Variant UUID
pub type VariantUuid = TypedUuid<VariantRecord>;

/// A purchasable colour/size combination of a product and its stock level.
#[derive(Debug, Clone, Serialize)]
pub struct VariantRecord {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub sku: String,
    pub color: String,
    pub size: String,
    pub stock_quantity: u64,
    pub price_adjustment: i64,
    pub status: VariantStatus,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl VariantRecord {
    /// `color/size` label.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.color, self.size)
    }
}
