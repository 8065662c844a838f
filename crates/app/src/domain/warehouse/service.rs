//! Warehouse service.

use async_trait::async_trait;
use mockall::automock;
use stockroom::ledger::MovementKind;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        variants::{PgVariantsRepository, records::VariantUuid},
        warehouse::{
            data::NewStockMovement,
            errors::WarehouseServiceError,
            records::{StockMovementRecord, VariantMovementRecord},
            repository::PgWarehouseRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgWarehouseService {
    db: Db,
    variants: PgVariantsRepository,
    warehouse: PgWarehouseRepository,
}

impl PgWarehouseService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            variants: PgVariantsRepository::new(),
            warehouse: PgWarehouseRepository::new(),
        }
    }

    async fn record(
        &self,
        kind: MovementKind,
        movement: NewStockMovement,
    ) -> Result<StockMovementRecord, WarehouseServiceError> {
        let actor = movement.actor.trim();

        if actor.is_empty() {
            return Err(WarehouseServiceError::MissingActor);
        }

        if movement.items.is_empty() {
            return Err(WarehouseServiceError::EmptyMovement);
        }

        if movement.items.iter().any(|item| item.quantity == 0) {
            return Err(WarehouseServiceError::ZeroQuantity);
        }

        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .warehouse
            .record_movement::<WarehouseServiceError>(
                &mut tx,
                kind,
                actor,
                movement.reference.as_deref(),
                &movement.items,
            )
            .await?;

        tx.commit().await?;

        info!(
            movement_uuid = %record.uuid,
            kind = %kind,
            items = record.items.len(),
            "recorded stock movement"
        );

        Ok(record)
    }
}

#[async_trait]
impl WarehouseService for PgWarehouseService {
    #[tracing::instrument(
        name = "warehouse.service.create_stock_entry",
        skip(self, movement),
        fields(actor = %movement.actor, items = movement.items.len()),
        err
    )]
    async fn create_stock_entry(
        &self,
        movement: NewStockMovement,
    ) -> Result<StockMovementRecord, WarehouseServiceError> {
        self.record(MovementKind::Entry, movement).await
    }

    #[tracing::instrument(
        name = "warehouse.service.create_stock_issue",
        skip(self, movement),
        fields(actor = %movement.actor, items = movement.items.len()),
        err
    )]
    async fn create_stock_issue(
        &self,
        movement: NewStockMovement,
    ) -> Result<StockMovementRecord, WarehouseServiceError> {
        self.record(MovementKind::Issue, movement).await
    }

    async fn list_movements(
        &self,
        variant: VariantUuid,
    ) -> Result<Vec<VariantMovementRecord>, WarehouseServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.variants.get_variant(&mut tx, variant).await?;

        let movements = self.warehouse.list_variant_movements(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(movements)
    }
}

#[automock]
#[async_trait]
pub trait WarehouseService: Send + Sync {
    /// Receive goods: add each item's quantity to its variant.
    async fn create_stock_entry(
        &self,
        movement: NewStockMovement,
    ) -> Result<StockMovementRecord, WarehouseServiceError>;

    /// Ship goods: subtract each item's quantity from its variant.
    ///
    /// All items apply or none do; an item larger than its variant's stock fails
    /// the whole movement with [`WarehouseServiceError::InsufficientStock`].
    async fn create_stock_issue(
        &self,
        movement: NewStockMovement,
    ) -> Result<StockMovementRecord, WarehouseServiceError>;

    /// Audit trail of one variant, newest first.
    async fn list_movements(
        &self,
        variant: VariantUuid,
    ) -> Result<Vec<VariantMovementRecord>, WarehouseServiceError>;
}

#[cfg(test)]
mod tests {
    use stockroom::ledger::InsufficientStock;
    use testresult::TestResult;

    use crate::{
        domain::warehouse::data::NewMovementItem,
        test::{TestContext, helpers},
    };

    use super::*;

    fn movement(items: &[(VariantUuid, u64)]) -> NewStockMovement {
        NewStockMovement {
            actor: "warehouse".to_string(),
            reference: Some("PO-1001".to_string()),
            items: items
                .iter()
                .map(|&(variant, quantity)| NewMovementItem { variant, quantity })
                .collect(),
        }
    }

    #[tokio::test]
    async fn stock_entry_increments_each_variant() -> TestResult {
        let ctx = TestContext::new().await;
        let product = helpers::create_product(&ctx, "SH01", "Runner").await?;
        let red = helpers::create_variant(&ctx, product, "SH01-RED-40-001", "Red", "40", 2).await?;
        let blue = helpers::create_variant(&ctx, product, "SH01-BLUE-40-002", "Blue", "40", 0).await?;

        let record = ctx
            .warehouse
            .create_stock_entry(movement(&[(red, 3), (blue, 5)]))
            .await?;

        assert_eq!(record.kind, MovementKind::Entry);
        assert_eq!(record.items.len(), 2);
        assert_eq!(helpers::stock_of(&ctx, red).await?, 5);
        assert_eq!(helpers::stock_of(&ctx, blue).await?, 5);

        Ok(())
    }

    #[tokio::test]
    async fn stock_issue_beyond_stock_fails_and_rolls_back_every_item() -> TestResult {
        let ctx = TestContext::new().await;
        let product = helpers::create_product(&ctx, "SH01", "Runner").await?;
        let red = helpers::create_variant(&ctx, product, "SH01-RED-40-001", "Red", "40", 4).await?;
        let blue = helpers::create_variant(&ctx, product, "SH01-BLUE-40-002", "Blue", "40", 1).await?;

        let result = ctx
            .warehouse
            .create_stock_issue(movement(&[(red, 2), (blue, 3)]))
            .await;

        assert!(
            matches!(
                result,
                Err(WarehouseServiceError::InsufficientStock(InsufficientStock {
                    ref sku,
                    available: 1,
                    requested: 3,
                })) if sku == "SH01-BLUE-40-002"
            ),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(helpers::stock_of(&ctx, red).await?, 4);
        assert_eq!(helpers::stock_of(&ctx, blue).await?, 1);
        assert!(ctx.warehouse.list_movements(red).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn stock_issue_can_empty_a_variant() -> TestResult {
        let ctx = TestContext::new().await;
        let product = helpers::create_product(&ctx, "SH01", "Runner").await?;
        let red = helpers::create_variant(&ctx, product, "SH01-RED-40-001", "Red", "40", 3).await?;

        let record = ctx.warehouse.create_stock_issue(movement(&[(red, 3)])).await?;

        assert_eq!(record.items.first().map(|item| item.stock_after), Some(0));
        assert_eq!(helpers::stock_of(&ctx, red).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantities_and_empty_movements_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = helpers::create_product(&ctx, "SH01", "Runner").await?;
        let red = helpers::create_variant(&ctx, product, "SH01-RED-40-001", "Red", "40", 3).await?;

        let zero = ctx.warehouse.create_stock_entry(movement(&[(red, 0)])).await;
        let empty = ctx.warehouse.create_stock_entry(movement(&[])).await;

        assert!(
            matches!(zero, Err(WarehouseServiceError::ZeroQuantity)),
            "expected ZeroQuantity, got {zero:?}"
        );
        assert!(
            matches!(empty, Err(WarehouseServiceError::EmptyMovement)),
            "expected EmptyMovement, got {empty:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_variant_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .warehouse
            .create_stock_entry(movement(&[(VariantUuid::new(), 1)]))
            .await;

        assert!(
            matches!(result, Err(WarehouseServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn issues_racing_entries_report_stock_not_a_missing_variant() -> TestResult {
        let ctx = TestContext::new().await;
        let product = helpers::create_product(&ctx, "SH01", "Runner").await?;
        let red = helpers::create_variant(&ctx, product, "SH01-RED-40-001", "Red", "40", 1).await?;

        let mut expected = 1;

        for _ in 0..5 {
            let (issue, entry) = tokio::join!(
                ctx.warehouse.create_stock_issue(movement(&[(red, expected + 2)])),
                ctx.warehouse.create_stock_entry(movement(&[(red, 5)])),
            );

            entry?;

            expected = match issue {
                Ok(_) => 3,
                Err(WarehouseServiceError::InsufficientStock(_)) => expected + 5,
                Err(error) => return Err(format!("expected stock outcome, got {error:?}").into()),
            };

            assert_eq!(helpers::stock_of(&ctx, red).await?, expected);
        }

        Ok(())
    }

    #[tokio::test]
    async fn movements_are_listed_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let product = helpers::create_product(&ctx, "SH01", "Runner").await?;
        let red = helpers::create_variant(&ctx, product, "SH01-RED-40-001", "Red", "40", 0).await?;

        ctx.warehouse.create_stock_entry(movement(&[(red, 5)])).await?;
        ctx.warehouse.create_stock_issue(movement(&[(red, 2)])).await?;

        let movements = ctx.warehouse.list_movements(red).await?;

        let trail: Vec<(MovementKind, u64, u64)> = movements
            .iter()
            .map(|m| (m.kind, m.quantity, m.stock_after))
            .collect();

        assert_eq!(
            trail,
            vec![(MovementKind::Issue, 2, 3), (MovementKind::Entry, 5, 5)]
        );

        Ok(())
    }
}
