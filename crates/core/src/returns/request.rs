//! Return Request Payloads

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::variants::combination_key;

/// Kind of return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnType {
    /// Swap for another size or colour of the same product.
    Exchange,

    /// Money back.
    Refund,
}

impl ReturnType {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exchange => "EXCHANGE",
            Self::Refund => "REFUND",
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown return type string.
#[derive(Debug, Error)]
#[error("unknown return type: {0}")]
pub struct UnknownReturnType(pub String);

impl FromStr for ReturnType {
    type Err = UnknownReturnType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXCHANGE" => Ok(Self::Exchange),
            "REFUND" => Ok(Self::Refund),
            other => Err(UnknownReturnType(other.to_string())),
        }
    }
}

/// Variant the customer wants instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeTarget {
    /// Requested size.
    pub size: String,

    /// Requested colour.
    pub color: String,
}

/// Account the refund is transferred to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo {
    /// Bank name.
    pub bank_name: String,

    /// Account number.
    pub account_number: String,

    /// Account holder.
    pub account_holder: String,
}

/// Refund payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundDetails {
    /// Amount in minor units.
    pub amount: u64,

    /// Destination account.
    pub bank: BankInfo,
}

/// Type-specific payload of a return request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnKind {
    /// Exchange for another variant.
    Exchange(ExchangeTarget),

    /// Refund to a bank account.
    Refund(RefundDetails),
}

impl ReturnKind {
    /// Discriminant.
    #[must_use]
    pub const fn return_type(&self) -> ReturnType {
        match self {
            Self::Exchange(_) => ReturnType::Exchange,
            Self::Refund(_) => ReturnType::Refund,
        }
    }

    /// Exchange target, when this is an exchange.
    #[must_use]
    pub const fn exchange_target(&self) -> Option<&ExchangeTarget> {
        match self {
            Self::Exchange(target) => Some(target),
            Self::Refund(_) => None,
        }
    }

    /// How a completed request of this kind is settled.
    #[must_use]
    pub const fn settlement(&self) -> Settlement {
        match self {
            Self::Exchange(_) => Settlement::ExchangeIssued,
            Self::Refund(_) => Settlement::AwaitingBankTransfer,
        }
    }
}

/// Follow-up recorded when a request is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    /// The replacement variant left the warehouse.
    ExchangeIssued,

    /// Finance still has to make the manual bank transfer.
    AwaitingBankTransfer,
}

impl Settlement {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExchangeIssued => "exchange_issued",
            Self::AwaitingBankTransfer => "awaiting_bank_transfer",
        }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown settlement string.
#[derive(Debug, Error)]
#[error("unknown settlement: {0}")]
pub struct UnknownSettlement(pub String);

impl FromStr for Settlement {
    type Err = UnknownSettlement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exchange_issued" => Ok(Self::ExchangeIssued),
            "awaiting_bank_transfer" => Ok(Self::AwaitingBankTransfer),
            other => Err(UnknownSettlement(other.to_string())),
        }
    }
}

/// The order line a return is raised against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasedLine<'a> {
    /// Size bought.
    pub size: &'a str,

    /// Colour bought.
    pub color: &'a str,

    /// Units bought.
    pub quantity: u64,

    /// Unit price in minor units.
    pub unit_price: u64,
}

impl PurchasedLine<'_> {
    /// Total paid for the line, saturating.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.quantity.saturating_mul(self.unit_price)
    }
}

/// A return request payload or staff input failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnValidationError {
    /// A required text field is empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Refunds must be for a positive amount.
    #[error("refund amount must be greater than zero")]
    ZeroRefund,

    /// Refund larger than what the customer paid for the line.
    #[error("refund amount {requested} exceeds the line total {line_total}")]
    RefundExceedsLineTotal {
        /// Requested amount.
        requested: u64,

        /// Amount paid for the line.
        line_total: u64,
    },

    /// The exchange target is the variant that was bought.
    #[error("exchange target {size}/{color} is the purchased variant")]
    SameVariantExchange {
        /// Requested size.
        size: String,

        /// Requested colour.
        color: String,
    },
}

/// Trimmed, non-empty text or a [`ReturnValidationError::MissingField`] naming `field`.
///
/// # Errors
///
/// Returns an error when `value` is empty after trimming.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ReturnValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ReturnValidationError::MissingField(field));
    }

    Ok(value.to_string())
}

/// Validate a customer's return submission against the purchased line.
///
/// # Errors
///
/// Returns the first rule the submission breaks.
pub fn validate_submission(
    reason: &str,
    kind: &ReturnKind,
    line: &PurchasedLine<'_>,
) -> Result<(), ReturnValidationError> {
    require_text("reason", reason)?;

    match kind {
        ReturnKind::Exchange(target) => {
            let size = require_text("exchange size", &target.size)?;
            let color = require_text("exchange color", &target.color)?;

            if combination_key(&color, &size) == combination_key(line.color.trim(), line.size.trim()) {
                return Err(ReturnValidationError::SameVariantExchange { size, color });
            }
        }
        ReturnKind::Refund(refund) => {
            require_text("bank name", &refund.bank.bank_name)?;
            require_text("account number", &refund.bank.account_number)?;
            require_text("account holder", &refund.bank.account_holder)?;

            if refund.amount == 0 {
                return Err(ReturnValidationError::ZeroRefund);
            }

            if refund.amount > line.total() {
                return Err(ReturnValidationError::RefundExceedsLineTotal {
                    requested: refund.amount,
                    line_total: line.total(),
                });
            }
        }
    }

    Ok(())
}
