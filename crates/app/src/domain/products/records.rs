//! Product Records

use jiff::Timestamp;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub code: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
