//! Stocktakes
//!
//! Counting happens on an in-memory [`StocktakeDraft`](stockroom::stocktakes::StocktakeDraft);
//! only confirming the balance touches the database, rebasing every counted
//! variant and writing the completed record in one transaction.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::StocktakesServiceError;
pub use service::*;
