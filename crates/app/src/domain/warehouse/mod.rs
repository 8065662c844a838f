//! Warehouse
//!
//! Stock entries and stock issues: the only writers of stock deltas. Every
//! delta is a conditional update, so concurrent movements never lose updates and
//! stock never goes below zero.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::PgWarehouseRepository;

pub use errors::WarehouseServiceError;
pub use service::*;
