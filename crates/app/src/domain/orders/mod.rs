//! Orders
//!
//! Read-only view of checkout's order lines, used to validate and settle returns.

pub mod records;
mod repository;

pub(crate) use repository::PgOrdersRepository;
