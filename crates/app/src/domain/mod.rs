//! Stockroom Domain Concerns

pub mod orders;
pub mod products;
pub mod returns;
pub mod stocktakes;
pub mod variants;
pub mod warehouse;
