//! Customer notifications
//!
//! Status changes of return requests are announced through a [`Notifier`].
//! Delivery is best effort: the change is already committed when the notifier
//! runs, and a failed notification is logged rather than surfaced.

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use stockroom::returns::{ReturnAction, ReturnStatus};
use thiserror::Error;
use tracing::info;

use crate::domain::returns::records::{ReturnRequestRecord, ReturnRequestUuid};

/// A return request changed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnNotification {
    pub request: ReturnRequestUuid,
    pub request_code: String,
    pub action: ReturnAction,
    pub status: ReturnStatus,
    pub note: Option<String>,
}

impl ReturnNotification {
    #[must_use]
    pub fn new(record: &ReturnRequestRecord, action: ReturnAction, note: Option<String>) -> Self {
        Self {
            request: record.uuid,
            request_code: record.request_code.clone(),
            action,
            status: record.status,
            note,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),
}

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the customer their return request changed status.
    async fn notify_return(&self, notification: ReturnNotification) -> Result<(), NotificationError>;
}

/// Writes notifications to the log. Used when no delivery channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_return(&self, notification: ReturnNotification) -> Result<(), NotificationError> {
        info!(
            request_uuid = %notification.request,
            request_code = %notification.request_code,
            action = %notification.action,
            status = %notification.status,
            note = notification.note.as_deref(),
            "return request notification"
        );

        Ok(())
    }
}
