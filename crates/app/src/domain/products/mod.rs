//! Products
//!
//! Read-only view of the catalogue. Products are created and edited elsewhere;
//! this crate only needs their code, name and thumbnail.

pub mod records;
mod repository;

pub(crate) use repository::PgProductsRepository;
