//! Product Variants

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod combinations;
pub mod generator;
pub mod sku;

/// Size recorded for variants of products that only vary by one attribute.
pub const FREE_SIZE: &str = "Free";

/// Lifecycle of a variant. Variants referenced by orders are archived, never deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantStatus {
    /// Sellable and included in stocktakes.
    #[default]
    Active,

    /// Soft-deleted.
    Archived,
}

impl VariantStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for VariantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown variant status string.
#[derive(Debug, Error)]
#[error("unknown variant status: {0}")]
pub struct UnknownVariantStatus(pub String);

impl FromStr for VariantStatus {
    type Err = UnknownVariantStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(UnknownVariantStatus(other.to_string())),
        }
    }
}

/// Case-insensitive identity of a `(color, size)` combination within a product.
#[must_use]
pub fn combination_key(color: &str, size: &str) -> String {
    format!("{}-{}", color.to_lowercase(), size.to_lowercase())
}

/// A variant produced by the generator that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDraft {
    /// Synthesised SKU.
    pub sku: String,

    /// First attribute value.
    pub color: String,

    /// Second attribute value, or [`FREE_SIZE`].
    pub size: String,

    /// Opening stock.
    pub stock_quantity: u64,

    /// Signed price difference from the product base price, in minor units.
    pub price_adjustment: i64,

    /// Image inherited from the product thumbnail.
    pub image_url: Option<String>,

    /// Initial status.
    pub status: VariantStatus,
}

impl VariantDraft {
    /// Human-readable `color/size` label.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.color, self.size)
    }
}
