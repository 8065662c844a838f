//! Return Requests
//!
//! A return request moves through [`ReturnStatus`] values only via
//! [`ReturnStatus::transition`]; payload rules live in [`request`].

pub mod request;
pub mod status;

pub use request::{
    BankInfo, ExchangeTarget, PurchasedLine, RefundDetails, ReturnKind, ReturnType,
    ReturnValidationError, Settlement,
};
pub use status::{InvalidTransition, ReturnAction, ReturnStatus};

/// Prefix of return request codes.
pub const REQUEST_CODE_PREFIX: &str = "RR";
