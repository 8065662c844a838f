//! Stocktake Lines

use serde::Serialize;
use uuid::Uuid;

/// One counted variant.
///
/// `discrepancy` is derived from the two counts on every change and cannot be set
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StocktakeLine {
    variant: Uuid,
    product_name: String,
    variant_name: String,
    sku: String,
    system_stock: u64,
    actual_stock: u64,
    discrepancy: i64,
}

impl StocktakeLine {
    /// Snapshot a variant's recorded stock, assuming the shelf matches.
    pub fn snapshot(
        variant: Uuid,
        product_name: impl Into<String>,
        variant_name: impl Into<String>,
        sku: impl Into<String>,
        system_stock: u64,
    ) -> Self {
        Self::counted(
            variant,
            product_name,
            variant_name,
            sku,
            system_stock,
            system_stock,
        )
    }

    /// A line with both counts known, e.g. when loading history.
    pub fn counted(
        variant: Uuid,
        product_name: impl Into<String>,
        variant_name: impl Into<String>,
        sku: impl Into<String>,
        system_stock: u64,
        actual_stock: u64,
    ) -> Self {
        Self {
            variant,
            product_name: product_name.into(),
            variant_name: variant_name.into(),
            sku: sku.into(),
            system_stock,
            actual_stock,
            discrepancy: signed_difference(actual_stock, system_stock),
        }
    }

    /// Counted variant.
    #[must_use]
    pub const fn variant(&self) -> Uuid {
        self.variant
    }

    /// Product name at snapshot time.
    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Variant label at snapshot time.
    #[must_use]
    pub fn variant_name(&self) -> &str {
        &self.variant_name
    }

    /// SKU at snapshot time.
    #[must_use]
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Stock the ledger recorded when counting started.
    #[must_use]
    pub const fn system_stock(&self) -> u64 {
        self.system_stock
    }

    /// Stock found on the shelf.
    #[must_use]
    pub const fn actual_stock(&self) -> u64 {
        self.actual_stock
    }

    /// `actual_stock - system_stock`.
    #[must_use]
    pub const fn discrepancy(&self) -> i64 {
        self.discrepancy
    }

    pub(crate) fn set_actual_stock(&mut self, actual_stock: u64) {
        self.actual_stock = actual_stock;
        self.discrepancy = signed_difference(actual_stock, self.system_stock);
    }
}

fn signed_difference(actual: u64, system: u64) -> i64 {
    let difference = i128::from(actual) - i128::from(system);

    i64::try_from(difference).unwrap_or(if difference.is_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
