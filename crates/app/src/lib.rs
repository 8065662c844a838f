//! Services and persistence for the stockroom back office.

pub mod context;
pub mod database;
pub mod domain;
pub mod notifications;
pub mod observability;

#[cfg(test)]
mod test;

pub mod uuids;
