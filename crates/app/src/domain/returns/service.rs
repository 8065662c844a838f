//! Returns service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use stockroom::{
    codes::document_code,
    ledger::{MovementKind, ensure_available},
    returns::{
        InvalidTransition, REQUEST_CODE_PREFIX, ReturnAction, ReturnKind, ReturnStatus,
        request::{require_text, validate_submission},
    },
};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        orders::{PgOrdersRepository, records::OrderItemRecord},
        returns::{
            data::{NewReturnRequest, StatusChange},
            errors::ReturnsServiceError,
            records::{ReturnRequestRecord, ReturnRequestUuid},
            repository::PgReturnRequestsRepository,
        },
        variants::{PgVariantsRepository, records::VariantRecord},
        warehouse::{PgWarehouseRepository, data::NewMovementItem},
    },
    notifications::{Notifier, ReturnNotification},
};

#[derive(Clone)]
pub struct PgReturnsService {
    db: Db,
    requests: PgReturnRequestsRepository,
    orders: PgOrdersRepository,
    variants: PgVariantsRepository,
    warehouse: PgWarehouseRepository,
    notifier: Arc<dyn Notifier>,
}

impl PgReturnsService {
    #[must_use]
    pub fn new(db: Db, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            requests: PgReturnRequestsRepository::new(),
            orders: PgOrdersRepository::new(),
            variants: PgVariantsRepository::new(),
            warehouse: PgWarehouseRepository::new(),
            notifier,
        }
    }

    /// Check `action` against the request's current status and return the
    /// request with its target status.
    async fn load_for(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: ReturnRequestUuid,
        action: ReturnAction,
    ) -> Result<(ReturnRequestRecord, ReturnStatus), ReturnsServiceError> {
        let current = self.requests.get_return_request(tx, uuid).await?;
        let to = current.status.transition(action)?;

        Ok((current, to))
    }

    /// Write a status change guarded by the status it was validated against.
    async fn swap_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        current: &ReturnRequestRecord,
        action: ReturnAction,
        change: StatusChange<'_>,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError> {
        if let Some(updated) = self
            .requests
            .update_status(tx, current.uuid, current.status, &change)
            .await?
        {
            return Ok(updated);
        }

        let winner = self.requests.get_return_request(tx, current.uuid).await?;

        Err(InvalidTransition {
            from: winner.status,
            action,
        }
        .into())
    }

    /// The active variant an exchange hands out, if `kind` is an exchange.
    async fn exchange_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: &ReturnKind,
        item: &OrderItemRecord,
    ) -> Result<Option<VariantRecord>, ReturnsServiceError> {
        let Some(target) = kind.exchange_target() else {
            return Ok(None);
        };

        let variant = self
            .variants
            .find_active_variant(tx, item.product_uuid, &target.color, &target.size)
            .await?
            .ok_or_else(|| ReturnsServiceError::ExchangeTargetNotFound {
                size: target.size.clone(),
                color: target.color.clone(),
            })?;

        Ok(Some(variant))
    }

    async fn notify(&self, record: &ReturnRequestRecord, action: ReturnAction, note: Option<String>) {
        let notification = ReturnNotification::new(record, action, note);

        if let Err(error) = self.notifier.notify_return(notification).await {
            warn!(
                request_uuid = %record.uuid,
                request_code = %record.request_code,
                status = %record.status,
                error = %error,
                "failed to send return request notification"
            );
        }
    }
}

#[async_trait]
impl ReturnsService for PgReturnsService {
    #[tracing::instrument(
        name = "returns.service.submit_return_request",
        skip(self, request),
        fields(
            order_item_uuid = %request.order_item,
            return_type = %request.kind.return_type(),
            request_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn submit_return_request(
        &self,
        request: NewReturnRequest,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let item = self.orders.get_order_item(&mut tx, request.order_item).await?;

        validate_submission(&request.reason, &request.kind, &item.purchased_line())?;

        let uuid = ReturnRequestUuid::new();
        let request_code = document_code(REQUEST_CODE_PREFIX, Timestamp::now(), uuid.into_uuid());

        tracing::Span::current().record("request_uuid", tracing::field::display(uuid));

        let record = self
            .requests
            .create_return_request(&mut tx, uuid, &request_code, &item, &request)
            .await?;

        tx.commit().await?;

        info!(request_uuid = %uuid, request_code = %request_code, "submitted return request");

        Ok(record)
    }

    async fn get_return_request(
        &self,
        uuid: ReturnRequestUuid,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.requests.get_return_request(&mut tx, uuid).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_return_requests(
        &self,
        status: Option<ReturnStatus>,
    ) -> Result<Vec<ReturnRequestRecord>, ReturnsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let records = self.requests.list_return_requests(&mut tx, status).await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "returns.service.approve",
        skip(self, notes),
        fields(request_uuid = %uuid, actor = %actor),
        err
    )]
    async fn approve(
        &self,
        uuid: ReturnRequestUuid,
        notes: Option<String>,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError> {
        let actor = require_text("actor", &actor)?;

        let mut tx = self.db.begin_transaction().await?;

        let (current, to) = self.load_for(&mut tx, uuid, ReturnAction::Approve).await?;

        let item = self.orders.get_order_item(&mut tx, current.order_item_uuid).await?;

        if let Some(target) = self.exchange_variant(&mut tx, &current.kind, &item).await? {
            ensure_available(&target.sku, target.stock_quantity, item.quantity)?;
        }

        let updated = self
            .swap_status(
                &mut tx,
                &current,
                ReturnAction::Approve,
                StatusChange {
                    to,
                    actor: &actor,
                    notes: notes.as_deref(),
                    rejection_reason: None,
                    settlement: None,
                },
            )
            .await?;

        tx.commit().await?;

        info!(request_uuid = %uuid, status = %updated.status, "approved return request");

        self.notify(&updated, ReturnAction::Approve, notes).await;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "returns.service.reject",
        skip(self, reason),
        fields(request_uuid = %uuid, actor = %actor),
        err
    )]
    async fn reject(
        &self,
        uuid: ReturnRequestUuid,
        reason: String,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError> {
        let reason = require_text("rejection reason", &reason)?;
        let actor = require_text("actor", &actor)?;

        let mut tx = self.db.begin_transaction().await?;

        let (current, to) = self.load_for(&mut tx, uuid, ReturnAction::Reject).await?;

        let updated = self
            .swap_status(
                &mut tx,
                &current,
                ReturnAction::Reject,
                StatusChange {
                    to,
                    actor: &actor,
                    notes: None,
                    rejection_reason: Some(reason.as_str()),
                    settlement: None,
                },
            )
            .await?;

        tx.commit().await?;

        info!(request_uuid = %uuid, status = %updated.status, "rejected return request");

        self.notify(&updated, ReturnAction::Reject, Some(reason)).await;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "returns.service.mark_shipped_back",
        skip(self, notes),
        fields(request_uuid = %uuid, actor = %actor),
        err
    )]
    async fn mark_shipped_back(
        &self,
        uuid: ReturnRequestUuid,
        notes: Option<String>,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError> {
        let actor = require_text("actor", &actor)?;

        let mut tx = self.db.begin_transaction().await?;

        let (current, to) = self
            .load_for(&mut tx, uuid, ReturnAction::MarkShippedBack)
            .await?;

        let updated = self
            .swap_status(
                &mut tx,
                &current,
                ReturnAction::MarkShippedBack,
                StatusChange {
                    to,
                    actor: &actor,
                    notes: notes.as_deref(),
                    rejection_reason: None,
                    settlement: None,
                },
            )
            .await?;

        tx.commit().await?;

        info!(request_uuid = %uuid, status = %updated.status, "return request shipped back");

        self.notify(&updated, ReturnAction::MarkShippedBack, notes).await;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "returns.service.confirm_received",
        skip(self),
        fields(request_uuid = %uuid, actor = %actor, movement_uuid = tracing::field::Empty),
        err
    )]
    async fn confirm_received(
        &self,
        uuid: ReturnRequestUuid,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError> {
        let actor = require_text("actor", &actor)?;

        let mut tx = self.db.begin_transaction().await?;

        let (current, to) = self
            .load_for(&mut tx, uuid, ReturnAction::ConfirmReceived)
            .await?;

        let item = self.orders.get_order_item(&mut tx, current.order_item_uuid).await?;

        let updated = self
            .swap_status(
                &mut tx,
                &current,
                ReturnAction::ConfirmReceived,
                StatusChange {
                    to,
                    actor: &actor,
                    notes: None,
                    rejection_reason: None,
                    settlement: None,
                },
            )
            .await?;

        let movement = self
            .warehouse
            .record_movement::<ReturnsServiceError>(
                &mut tx,
                MovementKind::Entry,
                &actor,
                Some(updated.request_code.as_str()),
                &[NewMovementItem {
                    variant: item.variant_uuid,
                    quantity: item.quantity,
                }],
            )
            .await?;

        tx.commit().await?;

        tracing::Span::current().record("movement_uuid", tracing::field::display(movement.uuid));

        info!(
            request_uuid = %uuid,
            variant_uuid = %item.variant_uuid,
            quantity = item.quantity,
            "received returned item"
        );

        self.notify(&updated, ReturnAction::ConfirmReceived, None).await;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "returns.service.complete",
        skip(self),
        fields(request_uuid = %uuid, actor = %actor),
        err
    )]
    async fn complete(
        &self,
        uuid: ReturnRequestUuid,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError> {
        let actor = require_text("actor", &actor)?;

        let mut tx = self.db.begin_transaction().await?;

        let (current, to) = self.load_for(&mut tx, uuid, ReturnAction::Complete).await?;

        let item = self.orders.get_order_item(&mut tx, current.order_item_uuid).await?;
        let target = self.exchange_variant(&mut tx, &current.kind, &item).await?;

        let updated = self
            .swap_status(
                &mut tx,
                &current,
                ReturnAction::Complete,
                StatusChange {
                    to,
                    actor: &actor,
                    notes: None,
                    rejection_reason: None,
                    settlement: Some(current.kind.settlement()),
                },
            )
            .await?;

        if let Some(target) = &target {
            self.warehouse
                .record_movement::<ReturnsServiceError>(
                    &mut tx,
                    MovementKind::Issue,
                    &actor,
                    Some(updated.request_code.as_str()),
                    &[NewMovementItem {
                        variant: target.uuid,
                        quantity: item.quantity,
                    }],
                )
                .await?;
        }

        tx.commit().await?;

        info!(
            request_uuid = %uuid,
            settlement = ?updated.settlement,
            "completed return request"
        );

        self.notify(&updated, ReturnAction::Complete, None).await;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "returns.service.cancel",
        skip(self),
        fields(request_uuid = %uuid, actor = %actor),
        err
    )]
    async fn cancel(
        &self,
        uuid: ReturnRequestUuid,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError> {
        let actor = require_text("actor", &actor)?;

        let mut tx = self.db.begin_transaction().await?;

        let (current, to) = self.load_for(&mut tx, uuid, ReturnAction::Cancel).await?;

        let updated = self
            .swap_status(
                &mut tx,
                &current,
                ReturnAction::Cancel,
                StatusChange {
                    to,
                    actor: &actor,
                    notes: None,
                    rejection_reason: None,
                    settlement: None,
                },
            )
            .await?;

        tx.commit().await?;

        info!(request_uuid = %uuid, status = %updated.status, "cancelled return request");

        self.notify(&updated, ReturnAction::Cancel, None).await;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ReturnsService: Send + Sync {
    /// Raise a return request against one order line.
    async fn submit_return_request(
        &self,
        request: NewReturnRequest,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError>;

    /// Retrieve a single return request.
    async fn get_return_request(
        &self,
        uuid: ReturnRequestUuid,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError>;

    /// Return requests newest first, optionally filtered by status.
    async fn list_return_requests(
        &self,
        status: Option<ReturnStatus>,
    ) -> Result<Vec<ReturnRequestRecord>, ReturnsServiceError>;

    /// Accept a pending request. Exchanges need enough stock of the target variant.
    async fn approve(
        &self,
        uuid: ReturnRequestUuid,
        notes: Option<String>,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError>;

    /// Decline a pending request with a reason.
    async fn reject(
        &self,
        uuid: ReturnRequestUuid,
        reason: String,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError>;

    /// Record that the customer has sent the item back.
    async fn mark_shipped_back(
        &self,
        uuid: ReturnRequestUuid,
        notes: Option<String>,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError>;

    /// Record receipt of the returned item and restock the purchased variant.
    async fn confirm_received(
        &self,
        uuid: ReturnRequestUuid,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError>;

    /// Settle a received request: issue the exchange variant, or hand the refund
    /// to finance.
    async fn complete(
        &self,
        uuid: ReturnRequestUuid,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError>;

    /// Withdraw a pending request.
    async fn cancel(
        &self,
        uuid: ReturnRequestUuid,
        actor: String,
    ) -> Result<ReturnRequestRecord, ReturnsServiceError>;
}
