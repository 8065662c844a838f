//! Stockroom
//!
//! Inventory-consistency rules for a retail back office: SKU variant generation,
//! the return/exchange lifecycle and stocktake reconciliation. Everything in this
//! crate is pure; persistence lives in `stockroom-app`.

pub mod codes;
pub mod ledger;
pub mod returns;
pub mod stocktakes;
pub mod variants;
