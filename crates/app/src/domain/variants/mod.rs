//! Variants

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::PgVariantsRepository;

pub use errors::VariantsServiceError;
pub use service::*;
