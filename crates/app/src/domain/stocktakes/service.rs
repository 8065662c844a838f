//! Stocktakes service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use stockroom::{
    codes::document_code,
    stocktakes::{STOCKTAKE_CODE_PREFIX, StocktakeDraft, StocktakeError, StocktakeScope},
};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        products::{PgProductsRepository, records::ProductUuid},
        stocktakes::{
            errors::StocktakesServiceError,
            records::{StocktakeRecord, StocktakeSummaryRecord, StocktakeUuid},
            repository::PgStocktakesRepository,
        },
        variants::records::VariantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgStocktakesService {
    db: Db,
    products: PgProductsRepository,
    stocktakes: PgStocktakesRepository,
}

impl PgStocktakesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            products: PgProductsRepository::new(),
            stocktakes: PgStocktakesRepository::new(),
        }
    }
}

#[async_trait]
impl StocktakesService for PgStocktakesService {
    #[tracing::instrument(
        name = "stocktakes.service.start_stocktake",
        skip(self),
        fields(scope = %scope, line_count = tracing::field::Empty),
        err
    )]
    async fn start_stocktake(
        &self,
        auditor: String,
        scope: StocktakeScope,
    ) -> Result<StocktakeDraft, StocktakesServiceError> {
        if auditor.trim().is_empty() {
            return Err(StocktakeError::MissingAuditor.into());
        }

        let mut tx = self.db.begin_transaction().await?;

        if let StocktakeScope::Product(product) = scope {
            self.products
                .get_product(&mut tx, ProductUuid::from_uuid(product))
                .await?;
        }

        let lines = self.stocktakes.snapshot_lines(&mut tx, scope).await?;

        tx.commit().await?;

        Span::current().record("line_count", lines.len());

        Ok(StocktakeDraft::start(&auditor, scope, Timestamp::now(), lines)?)
    }

    #[tracing::instrument(
        name = "stocktakes.service.confirm_balance",
        skip(self, draft),
        fields(
            draft_id = %draft.id(),
            actor = %actor,
            stocktake_uuid = tracing::field::Empty,
            total_discrepancy = tracing::field::Empty
        ),
        err
    )]
    async fn confirm_balance(
        &self,
        draft: StocktakeDraft,
        actor: String,
    ) -> Result<StocktakeRecord, StocktakesServiceError> {
        let actor = actor.trim();

        if actor.is_empty() {
            return Err(StocktakesServiceError::MissingActor);
        }

        let uuid = StocktakeUuid::new();
        let started_at = draft.started_at();
        let completed_at = Timestamp::now();
        let code = document_code(STOCKTAKE_CODE_PREFIX, completed_at, uuid.into_uuid());

        let stocktake = draft.complete(code, actor.to_string(), completed_at);

        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .stocktakes
            .create_stocktake(&mut tx, uuid, started_at, &stocktake)
            .await?;

        if created.is_none() {
            let code = self
                .stocktakes
                .find_code_by_draft(&mut tx, stocktake.draft_id())
                .await?;

            return Err(StocktakeError::AlreadyCompleted(code).into());
        }

        for (position, line) in stocktake.lines().iter().enumerate() {
            let variant = VariantUuid::from_uuid(line.variant());

            if !self
                .stocktakes
                .rebase_variant(&mut tx, variant, line.actual_stock())
                .await?
            {
                return Err(StocktakesServiceError::VariantUnavailable {
                    sku: line.sku().to_string(),
                });
            }

            self.stocktakes
                .create_stocktake_item(&mut tx, uuid, i32::try_from(position)?, line)
                .await?;
        }

        tx.commit().await?;

        Span::current()
            .record("stocktake_uuid", tracing::field::display(uuid))
            .record("total_discrepancy", stocktake.total_discrepancy());

        info!(
            stocktake_uuid = %uuid,
            code = %stocktake.code(),
            lines = stocktake.lines().len(),
            total_discrepancy = stocktake.total_discrepancy(),
            "confirmed stocktake balance"
        );

        Ok(StocktakeRecord {
            uuid,
            started_at,
            stocktake,
        })
    }

    async fn list_stocktakes(&self) -> Result<Vec<StocktakeSummaryRecord>, StocktakesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let stocktakes = self.stocktakes.list_stocktakes(&mut tx).await?;

        tx.commit().await?;

        Ok(stocktakes)
    }

    async fn get_stocktake(
        &self,
        stocktake: StocktakeUuid,
    ) -> Result<StocktakeRecord, StocktakesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let stocktake = self.stocktakes.get_stocktake(&mut tx, stocktake).await?;

        tx.commit().await?;

        Ok(stocktake)
    }
}

#[automock]
#[async_trait]
pub trait StocktakesService: Send + Sync {
    /// Snapshot the stock of every active variant in `scope` into a new draft.
    ///
    /// Nothing is written; the draft lives only in the caller's memory.
    ///
    /// # Errors
    ///
    /// Returns [`StocktakesServiceError::Stocktake`] for a blank auditor name and
    /// [`StocktakesServiceError::NotFound`] when a scoped product does not exist.
    async fn start_stocktake(
        &self,
        auditor: String,
        scope: StocktakeScope,
    ) -> Result<StocktakeDraft, StocktakesServiceError>;

    /// Rebase every counted variant to its physical count and record the
    /// completed stocktake, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StocktakesServiceError::VariantUnavailable`] when a counted
    /// variant was archived since the draft was taken, and
    /// [`StocktakeError::AlreadyCompleted`] when the draft was already confirmed.
    /// Nothing is written in either case.
    async fn confirm_balance(
        &self,
        draft: StocktakeDraft,
        actor: String,
    ) -> Result<StocktakeRecord, StocktakesServiceError>;

    /// Completed stocktakes, newest first.
    async fn list_stocktakes(&self) -> Result<Vec<StocktakeSummaryRecord>, StocktakesServiceError>;

    /// A completed stocktake with its lines.
    ///
    /// # Errors
    ///
    /// Returns [`StocktakesServiceError::NotFound`] for unknown stocktakes.
    async fn get_stocktake(
        &self,
        stocktake: StocktakeUuid,
    ) -> Result<StocktakeRecord, StocktakesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            variants::VariantsService,
            warehouse::{
                WarehouseService,
                data::{NewMovementItem, NewStockMovement},
            },
        },
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn confirm_balance_rebases_stock_to_the_count() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "TEE", "Basic Tee").await?;
        let variant = helpers::create_variant(&ctx, product, "TEE-RED-M-001", "Red", "M", 20).await?;

        let mut draft = ctx
            .stocktakes
            .start_stocktake("Linh".to_string(), StocktakeScope::All)
            .await?;

        let line = draft.edit_line(variant.into_uuid(), 17)?;

        assert_eq!(line.system_stock(), 20);
        assert_eq!(line.discrepancy(), -3);

        let record = ctx
            .stocktakes
            .confirm_balance(draft, "Minh".to_string())
            .await?;

        assert_eq!(record.stocktake.total_discrepancy(), -3);
        assert!(record.stocktake.code().starts_with("ST-"));
        assert_eq!(helpers::stock_of(&ctx, variant).await?, 17);

        let stored = ctx.stocktakes.get_stocktake(record.uuid).await?;

        assert_eq!(stored.stocktake, record.stocktake);
        assert_eq!(stored.stocktake.lines()[0].variant_name(), "Red/M");
        assert_eq!(stored.stocktake.lines()[0].product_name(), "Basic Tee");

        Ok(())
    }

    #[tokio::test]
    async fn start_snapshots_active_variants_in_scope() -> TestResult {
        let ctx = TestContext::new().await;

        let tee = helpers::create_product(&ctx, "TEE", "Basic Tee").await?;
        let cap = helpers::create_product(&ctx, "CAP", "Cap").await?;

        helpers::create_variant(&ctx, tee, "TEE-RED-M-001", "Red", "M", 4).await?;
        let archived = helpers::create_variant(&ctx, tee, "TEE-RED-L-002", "Red", "L", 9).await?;
        helpers::create_variant(&ctx, cap, "CAP-BLACK-FREE-001", "Black", "Free", 2).await?;

        ctx.variants.archive_variant(archived).await?;

        let everything = ctx
            .stocktakes
            .start_stocktake("Linh".to_string(), StocktakeScope::All)
            .await?;
        let tees = ctx
            .stocktakes
            .start_stocktake("Linh".to_string(), StocktakeScope::Product(tee.into_uuid()))
            .await?;

        let skus: Vec<&str> = everything.lines().iter().map(|line| line.sku()).collect();

        assert_eq!(skus, ["TEE-RED-M-001", "CAP-BLACK-FREE-001"]);
        assert_eq!(tees.lines().len(), 1);
        assert_eq!(tees.total_discrepancy(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn start_rejects_blank_auditor_and_unknown_product() {
        let ctx = TestContext::new().await;

        let blank = ctx
            .stocktakes
            .start_stocktake("  ".to_string(), StocktakeScope::All)
            .await;
        let unknown = ctx
            .stocktakes
            .start_stocktake(
                "Linh".to_string(),
                StocktakeScope::Product(ProductUuid::new().into_uuid()),
            )
            .await;

        assert!(
            matches!(
                blank,
                Err(StocktakesServiceError::Stocktake(StocktakeError::MissingAuditor))
            ),
            "expected MissingAuditor, got {blank:?}"
        );
        assert!(
            matches!(unknown, Err(StocktakesServiceError::NotFound)),
            "expected NotFound, got {unknown:?}"
        );
    }

    #[tokio::test]
    async fn failing_line_rolls_back_the_whole_balance() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "TEE", "Basic Tee").await?;
        let first = helpers::create_variant(&ctx, product, "TEE-A-M-001", "A", "M", 10).await?;
        let middle = helpers::create_variant(&ctx, product, "TEE-B-M-002", "B", "M", 10).await?;
        let last = helpers::create_variant(&ctx, product, "TEE-C-M-003", "C", "M", 10).await?;

        let mut draft = ctx
            .stocktakes
            .start_stocktake("Linh".to_string(), StocktakeScope::All)
            .await?;

        draft.apply_counts([("TEE-A-M-001", 7), ("TEE-B-M-002", 8), ("TEE-C-M-003", 9)])?;

        ctx.variants.archive_variant(middle).await?;

        let result = ctx
            .stocktakes
            .confirm_balance(draft, "Minh".to_string())
            .await;

        assert!(
            matches!(
                result,
                Err(StocktakesServiceError::VariantUnavailable { ref sku }) if sku == "TEE-B-M-002"
            ),
            "expected VariantUnavailable, got {result:?}"
        );

        for variant in [first, middle, last] {
            assert_eq!(helpers::stock_of(&ctx, variant).await?, 10);
        }

        assert!(ctx.stocktakes.list_stocktakes().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn a_draft_can_only_be_confirmed_once() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "TEE", "Basic Tee").await?;
        let variant = helpers::create_variant(&ctx, product, "TEE-RED-M-001", "Red", "M", 20).await?;

        let mut draft = ctx
            .stocktakes
            .start_stocktake("Linh".to_string(), StocktakeScope::All)
            .await?;

        draft.edit_line(variant.into_uuid(), 17)?;

        let mut copy = draft.clone();

        let first = ctx
            .stocktakes
            .confirm_balance(draft, "Minh".to_string())
            .await?;

        copy.edit_line(variant.into_uuid(), 5)?;

        let second = ctx
            .stocktakes
            .confirm_balance(copy, "Minh".to_string())
            .await;

        assert!(
            matches!(
                second,
                Err(StocktakesServiceError::Stocktake(StocktakeError::AlreadyCompleted(ref code)))
                    if code == first.stocktake.code()
            ),
            "expected AlreadyCompleted, got {second:?}"
        );
        assert_eq!(helpers::stock_of(&ctx, variant).await?, 17);
        assert_eq!(ctx.stocktakes.list_stocktakes().await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn confirm_requires_an_actor() -> TestResult {
        let ctx = TestContext::new().await;

        let draft = ctx
            .stocktakes
            .start_stocktake("Linh".to_string(), StocktakeScope::All)
            .await?;

        let result = ctx.stocktakes.confirm_balance(draft, " ".to_string()).await;

        assert!(
            matches!(result, Err(StocktakesServiceError::MissingActor)),
            "expected MissingActor, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn resumed_draft_keeps_its_snapshot_and_confirms_once() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "TEE", "Basic Tee").await?;
        let variant = helpers::create_variant(&ctx, product, "TEE-RED-M-001", "Red", "M", 20).await?;

        let draft = ctx
            .stocktakes
            .start_stocktake("Linh".to_string(), StocktakeScope::All)
            .await?;

        ctx.warehouse
            .create_stock_issue(NewStockMovement {
                actor: "shop floor".to_string(),
                reference: None,
                items: vec![NewMovementItem { variant, quantity: 2 }],
            })
            .await?;

        let resume = || -> Result<StocktakeDraft, StocktakeError> {
            let mut resumed = StocktakeDraft::resume(
                draft.id(),
                draft.auditor_name(),
                draft.scope(),
                draft.started_at(),
                draft.lines().to_vec(),
            )?;

            resumed.edit_line(variant.into_uuid(), 17)?;

            Ok(resumed)
        };

        let first = ctx
            .stocktakes
            .confirm_balance(resume()?, "Minh".to_string())
            .await?;

        let line = first.stocktake.lines().first().ok_or("expected one line")?;

        assert_eq!(line.system_stock(), 20);
        assert_eq!(line.discrepancy(), -3);
        assert_eq!(first.started_at, draft.started_at());
        assert_eq!(helpers::stock_of(&ctx, variant).await?, 17);

        let second = ctx
            .stocktakes
            .confirm_balance(resume()?, "Minh".to_string())
            .await;

        assert!(
            matches!(
                second,
                Err(StocktakesServiceError::Stocktake(StocktakeError::AlreadyCompleted(ref code)))
                    if code == first.stocktake.code()
            ),
            "expected AlreadyCompleted, got {second:?}"
        );
        assert_eq!(ctx.stocktakes.list_stocktakes().await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn counts_overwrite_movements_made_while_counting() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "TEE", "Basic Tee").await?;
        let variant = helpers::create_variant(&ctx, product, "TEE-RED-M-001", "Red", "M", 20).await?;

        let mut draft = ctx
            .stocktakes
            .start_stocktake("Linh".to_string(), StocktakeScope::All)
            .await?;

        ctx.warehouse
            .create_stock_entry(NewStockMovement {
                actor: "receiving".to_string(),
                reference: None,
                items: vec![NewMovementItem { variant, quantity: 5 }],
            })
            .await?;

        draft.edit_line(variant.into_uuid(), 18)?;

        let record = ctx
            .stocktakes
            .confirm_balance(draft, "Minh".to_string())
            .await?;

        assert_eq!(record.stocktake.total_discrepancy(), -2);
        assert_eq!(helpers::stock_of(&ctx, variant).await?, 18);

        Ok(())
    }

    #[tokio::test]
    async fn history_lists_newest_first() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "TEE", "Basic Tee").await?;
        helpers::create_variant(&ctx, product, "TEE-RED-M-001", "Red", "M", 20).await?;
        helpers::create_variant(&ctx, product, "TEE-RED-L-002", "Red", "L", 20).await?;

        let first_draft = ctx
            .stocktakes
            .start_stocktake("Linh".to_string(), StocktakeScope::All)
            .await?;
        let first = ctx
            .stocktakes
            .confirm_balance(first_draft, "Minh".to_string())
            .await?;

        let second_draft = ctx
            .stocktakes
            .start_stocktake("An".to_string(), StocktakeScope::All)
            .await?;
        let second = ctx
            .stocktakes
            .confirm_balance(second_draft, "Minh".to_string())
            .await?;

        let history = ctx.stocktakes.list_stocktakes().await?;
        let uuids: Vec<StocktakeUuid> = history.iter().map(|summary| summary.uuid).collect();

        assert_eq!(uuids, [second.uuid, first.uuid]);
        assert!(history.iter().all(|summary| summary.line_count == 2));
        assert_eq!(history[0].auditor_name, "An");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_stocktake_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.stocktakes.get_stocktake(StocktakeUuid::new()).await;

        assert!(
            matches!(result, Err(StocktakesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
