//! Return Request State Machine

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a return request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnStatus {
    /// Submitted by the customer, awaiting review.
    Pending,

    /// Accepted by staff; the customer may send the item back.
    Approved,

    /// The customer has shipped the item; the warehouse has not received it yet.
    ShippingBack,

    /// The item is back in the warehouse and restocked.
    Received,

    /// Exchange item issued, or refund handed over for bank transfer.
    Completed,

    /// Declined by staff.
    Rejected,

    /// Withdrawn by the customer.
    Cancelled,
}

impl ReturnStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Approved,
        Self::ShippingBack,
        Self::Received,
        Self::Completed,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::ShippingBack => "SHIPPING_BACK",
            Self::Received => "RECEIVED",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether no further transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }

    /// Apply `action` to this status.
    ///
    /// This is the complete transition table; every pair not listed is illegal.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when `action` is not allowed from this status.
    pub const fn transition(self, action: ReturnAction) -> Result<Self, InvalidTransition> {
        match (self, action) {
            (Self::Pending, ReturnAction::Approve) => Ok(Self::Approved),
            (Self::Pending, ReturnAction::Reject) => Ok(Self::Rejected),
            (Self::Pending, ReturnAction::Cancel) => Ok(Self::Cancelled),
            (Self::Approved, ReturnAction::MarkShippedBack) => Ok(Self::ShippingBack),
            (Self::Approved | Self::ShippingBack, ReturnAction::ConfirmReceived) => {
                Ok(Self::Received)
            }
            (Self::Received, ReturnAction::Complete) => Ok(Self::Completed),
            (from, action) => Err(InvalidTransition { from, action }),
        }
    }
}

impl fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown return status string.
#[derive(Debug, Error)]
#[error("unknown return status: {0}")]
pub struct UnknownReturnStatus(pub String);

impl FromStr for ReturnStatus {
    type Err = UnknownReturnStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownReturnStatus(s.to_string()))
    }
}

/// Operations that move a return request between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnAction {
    /// Staff accept the request.
    Approve,

    /// Staff decline the request.
    Reject,

    /// The customer withdraws the request.
    Cancel,

    /// The customer reports the parcel as sent.
    MarkShippedBack,

    /// The warehouse receives the returned item.
    ConfirmReceived,

    /// Staff settle the request.
    Complete,
}

impl ReturnAction {
    /// Every action.
    pub const ALL: [Self; 6] = [
        Self::Approve,
        Self::Reject,
        Self::Cancel,
        Self::MarkShippedBack,
        Self::ConfirmReceived,
        Self::Complete,
    ];

    /// Verb used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::MarkShippedBack => "mark as shipped back",
            Self::ConfirmReceived => "confirm receipt of",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for ReturnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action was attempted from a status that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} a return request that is {from}")]
pub struct InvalidTransition {
    /// Status the request was in.
    pub from: ReturnStatus,

    /// Attempted action.
    pub action: ReturnAction,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pending_can_be_approved_rejected_or_cancelled() -> TestResult {
        assert_eq!(
            ReturnStatus::Pending.transition(ReturnAction::Approve)?,
            ReturnStatus::Approved
        );
        assert_eq!(
            ReturnStatus::Pending.transition(ReturnAction::Reject)?,
            ReturnStatus::Rejected
        );
        assert_eq!(
            ReturnStatus::Pending.transition(ReturnAction::Cancel)?,
            ReturnStatus::Cancelled
        );

        Ok(())
    }

    #[test]
    fn receipt_is_allowed_with_or_without_shipping_back() -> TestResult {
        assert_eq!(
            ReturnStatus::Approved.transition(ReturnAction::ConfirmReceived)?,
            ReturnStatus::Received
        );
        assert_eq!(
            ReturnStatus::ShippingBack.transition(ReturnAction::ConfirmReceived)?,
            ReturnStatus::Received
        );

        Ok(())
    }

    #[test]
    fn completing_a_pending_request_is_invalid() {
        assert_eq!(
            ReturnStatus::Pending.transition(ReturnAction::Complete),
            Err(InvalidTransition {
                from: ReturnStatus::Pending,
                action: ReturnAction::Complete,
            })
        );
    }

    #[test]
    fn terminal_statuses_accept_no_action() {
        for status in ReturnStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for action in ReturnAction::ALL {
                assert!(
                    status.transition(action).is_err(),
                    "{status} should not accept {action}"
                );
            }
        }
    }

    #[test]
    fn status_round_trips_through_storage_string() -> TestResult {
        for status in ReturnStatus::ALL {
            assert_eq!(status.as_str().parse::<ReturnStatus>()?, status);
        }

        assert!("LOST".parse::<ReturnStatus>().is_err());

        Ok(())
    }

    #[test]
    fn invalid_transition_message_names_status_and_action() {
        let error = InvalidTransition {
            from: ReturnStatus::Received,
            action: ReturnAction::Approve,
        };

        assert_eq!(
            error.to_string(),
            "cannot approve a return request that is RECEIVED"
        );
    }
}
