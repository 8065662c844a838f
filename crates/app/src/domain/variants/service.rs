//! Variants service.

use async_trait::async_trait;
use mockall::automock;
use stockroom::variants::generator::{AttributeSelection, VariantGenerator};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        products::{PgProductsRepository, records::ProductUuid},
        variants::{
            data::GenerationReport,
            errors::VariantsServiceError,
            records::{VariantRecord, VariantUuid},
            repository::PgVariantsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgVariantsService {
    db: Db,
    products: PgProductsRepository,
    variants: PgVariantsRepository,
}

impl PgVariantsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            products: PgProductsRepository::new(),
            variants: PgVariantsRepository::new(),
        }
    }
}

#[async_trait]
impl VariantsService for PgVariantsService {
    async fn list_variants(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<VariantRecord>, VariantsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.products.get_product(&mut tx, product).await?;

        let variants = self.variants.list_variants(&mut tx, product).await?;

        tx.commit().await?;

        Ok(variants)
    }

    async fn get_variant(&self, variant: VariantUuid) -> Result<VariantRecord, VariantsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let variant = self.variants.get_variant(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(variant)
    }

    #[tracing::instrument(
        name = "variants.service.generate_variants",
        skip(self, selections),
        fields(
            product_uuid = %product,
            created = tracing::field::Empty,
            duplicates = tracing::field::Empty
        ),
        err
    )]
    async fn generate_variants(
        &self,
        product: ProductUuid,
        selections: Vec<AttributeSelection>,
    ) -> Result<GenerationReport, VariantsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.products.lock_product(&mut tx, product).await?;
        let existing = self.variants.list_variants(&mut tx, product).await?;

        let generation = VariantGenerator::new(
            &record.code,
            existing.iter().map(|variant| (&variant.color, &variant.size)),
        )
        .with_thumbnail(record.thumbnail_url.as_deref())
        .generate(&selections)?;

        let mut created = Vec::with_capacity(generation.accepted.len());

        for draft in &generation.accepted {
            created.push(self.variants.create_variant(&mut tx, product, draft).await?);
        }

        tx.commit().await?;

        let span = Span::current();

        span.record("created", created.len());
        span.record("duplicates", generation.duplicates.len());

        info!(product_uuid = %product, created = created.len(), "generated variants");

        Ok(GenerationReport {
            created,
            duplicates: generation.duplicates,
        })
    }

    #[tracing::instrument(
        name = "variants.service.archive_variant",
        skip(self),
        fields(variant_uuid = %variant),
        err
    )]
    async fn archive_variant(&self, variant: VariantUuid) -> Result<VariantRecord, VariantsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let archived = self.variants.archive_variant(&mut tx, variant).await?;

        tx.commit().await?;

        info!(variant_uuid = %variant, sku = %archived.sku, "archived variant");

        Ok(archived)
    }
}

#[automock]
#[async_trait]
pub trait VariantsService: Send + Sync {
    /// Every variant of a product, archived included.
    async fn list_variants(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<VariantRecord>, VariantsServiceError>;

    /// Retrieve a single variant.
    async fn get_variant(&self, variant: VariantUuid) -> Result<VariantRecord, VariantsServiceError>;

    /// Create every new colour/size combination of `selections` for a product.
    ///
    /// Combinations the product already has, archived ones included, are
    /// reported as duplicates instead of failing the call.
    async fn generate_variants(
        &self,
        product: ProductUuid,
        selections: Vec<AttributeSelection>,
    ) -> Result<GenerationReport, VariantsServiceError>;

    /// Soft-delete a variant. Archived variants keep their stock and history.
    async fn archive_variant(&self, variant: VariantUuid) -> Result<VariantRecord, VariantsServiceError>;
}
