//! Variants Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use stockroom::variants::VariantDraft;

use crate::{
    database::{decode_str, decode_u64, encode_u64},
    domain::{
        products::records::ProductUuid,
        variants::records::{VariantRecord, VariantUuid},
    },
};

const LIST_VARIANTS_SQL: &str = include_str!("sql/list_variants.sql");
const GET_VARIANT_SQL: &str = include_str!("sql/get_variant.sql");
const FIND_ACTIVE_VARIANT_SQL: &str = include_str!("sql/find_active_variant.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const ARCHIVE_VARIANT_SQL: &str = include_str!("sql/archive_variant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgVariantsRepository;

impl PgVariantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Every variant of `product`, archived included, oldest first.
    pub(crate) async fn list_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<VariantRecord>, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(LIST_VARIANTS_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(GET_VARIANT_SQL)
            .bind(variant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Active variant of `product` matching `color` and `size` case-insensitively.
    pub(crate) async fn find_active_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        color: &str,
        size: &str,
    ) -> Result<Option<VariantRecord>, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(FIND_ACTIVE_VARIANT_SQL)
            .bind(product.into_uuid())
            .bind(color.trim())
            .bind(size.trim())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        draft: &VariantDraft,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(CREATE_VARIANT_SQL)
            .bind(VariantUuid::new().into_uuid())
            .bind(product.into_uuid())
            .bind(&draft.sku)
            .bind(&draft.color)
            .bind(&draft.size)
            .bind(encode_u64("stock_quantity", draft.stock_quantity)?)
            .bind(draft.price_adjustment)
            .bind(draft.status.as_str())
            .bind(draft.image_url.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn archive_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(ARCHIVE_VARIANT_SQL)
            .bind(variant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for VariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: VariantUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            sku: row.try_get("sku")?,
            color: row.try_get("color")?,
            size: row.try_get("size")?,
            stock_quantity: decode_u64("stock_quantity", row.try_get("stock_quantity")?)?,
            price_adjustment: row.try_get("price_adjustment")?,
            status: decode_str("status", &status)?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
