//! Stocktakes Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use stockroom::stocktakes::{CompletedStocktake, StocktakeLine, StocktakeScope};
use uuid::Uuid;

use crate::{
    database::{decode_str, decode_u64, encode_u64},
    domain::{
        stocktakes::records::{StocktakeRecord, StocktakeSummaryRecord, StocktakeUuid},
        variants::records::VariantUuid,
    },
};

const SNAPSHOT_LINES_SQL: &str = include_str!("sql/snapshot_lines.sql");
const CREATE_STOCKTAKE_SQL: &str = include_str!("sql/create_stocktake.sql");
const FIND_CODE_BY_DRAFT_SQL: &str = include_str!("sql/find_code_by_draft.sql");
const REBASE_VARIANT_SQL: &str = include_str!("sql/rebase_variant.sql");
const CREATE_STOCKTAKE_ITEM_SQL: &str = include_str!("sql/create_stocktake_item.sql");
const LIST_STOCKTAKES_SQL: &str = include_str!("sql/list_stocktakes.sql");
const GET_STOCKTAKE_SQL: &str = include_str!("sql/get_stocktake.sql");
const LIST_STOCKTAKE_ITEMS_SQL: &str = include_str!("sql/list_stocktake_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStocktakesRepository;

impl PgStocktakesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Current stock of every active variant in `scope`, as uncounted lines.
    pub(crate) async fn snapshot_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        scope: StocktakeScope,
    ) -> Result<Vec<StocktakeLine>, sqlx::Error> {
        let product = match scope {
            StocktakeScope::All => None,
            StocktakeScope::Product(product) => Some(product),
        };

        let rows = query(SNAPSHOT_LINES_SQL)
            .bind(product)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| {
                let color: String = row.try_get("color")?;
                let size: String = row.try_get("size")?;
                let product_name: String = row.try_get("product_name")?;
                let sku: String = row.try_get("sku")?;

                Ok(StocktakeLine::snapshot(
                    row.try_get("uuid")?,
                    product_name,
                    format!("{color}/{size}"),
                    sku,
                    decode_u64("stock_quantity", row.try_get("stock_quantity")?)?,
                ))
            })
            .collect()
    }

    /// Insert the stocktake header. Returns `None` when the draft was already
    /// confirmed.
    pub(crate) async fn create_stocktake(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: StocktakeUuid,
        started_at: Timestamp,
        stocktake: &CompletedStocktake,
    ) -> Result<Option<StocktakeUuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = query_as(CREATE_STOCKTAKE_SQL)
            .bind(uuid.into_uuid())
            .bind(stocktake.code())
            .bind(stocktake.draft_id())
            .bind(stocktake.auditor_name())
            .bind(stocktake.completed_by())
            .bind(stocktake.scope().to_string())
            .bind(stocktake.total_discrepancy())
            .bind(SqlxTimestamp::from(started_at))
            .bind(SqlxTimestamp::from(stocktake.completed_at()))
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|(uuid,)| StocktakeUuid::from_uuid(uuid)))
    }

    pub(crate) async fn find_code_by_draft(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        draft: Uuid,
    ) -> Result<String, sqlx::Error> {
        let (code,): (String,) = query_as(FIND_CODE_BY_DRAFT_SQL)
            .bind(draft)
            .fetch_one(&mut **tx)
            .await?;

        Ok(code)
    }

    /// Set an active variant's stock to `actual_stock`. Returns `false` when the
    /// variant is missing or archived.
    pub(crate) async fn rebase_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        actual_stock: u64,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(Uuid,)> = query_as(REBASE_VARIANT_SQL)
            .bind(variant.into_uuid())
            .bind(encode_u64("stock_quantity", actual_stock)?)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.is_some())
    }

    pub(crate) async fn create_stocktake_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        stocktake: StocktakeUuid,
        position: i32,
        line: &StocktakeLine,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_STOCKTAKE_ITEM_SQL)
            .bind(stocktake.into_uuid())
            .bind(position)
            .bind(line.variant())
            .bind(line.product_name())
            .bind(line.variant_name())
            .bind(line.sku())
            .bind(encode_u64("system_stock", line.system_stock())?)
            .bind(encode_u64("actual_stock", line.actual_stock())?)
            .bind(line.discrepancy())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Completed stocktakes, newest first.
    pub(crate) async fn list_stocktakes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<StocktakeSummaryRecord>, sqlx::Error> {
        query_as::<Postgres, StocktakeSummaryRecord>(LIST_STOCKTAKES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_stocktake(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        stocktake: StocktakeUuid,
    ) -> Result<StocktakeRecord, sqlx::Error> {
        let header = query(GET_STOCKTAKE_SQL)
            .bind(stocktake.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let items = query(LIST_STOCKTAKE_ITEMS_SQL)
            .bind(stocktake.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        let lines = items
            .iter()
            .map(|row| {
                let product_name: String = row.try_get("product_name")?;
                let variant_name: String = row.try_get("variant_name")?;
                let sku: String = row.try_get("sku")?;

                Ok(StocktakeLine::counted(
                    row.try_get("variant_uuid")?,
                    product_name,
                    variant_name,
                    sku,
                    decode_u64("system_stock", row.try_get("system_stock")?)?,
                    decode_u64("actual_stock", row.try_get("actual_stock")?)?,
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let scope: String = header.try_get("scope")?;

        Ok(StocktakeRecord {
            uuid: StocktakeUuid::from_uuid(header.try_get("uuid")?),
            started_at: header.try_get::<SqlxTimestamp, _>("started_at")?.to_jiff(),
            stocktake: CompletedStocktake::new(
                header.try_get("draft_uuid")?,
                header.try_get("code")?,
                header.try_get("auditor_name")?,
                header.try_get("completed_by")?,
                decode_str("scope", &scope)?,
                header.try_get::<SqlxTimestamp, _>("completed_at")?.to_jiff(),
                lines,
            ),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for StocktakeSummaryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let scope: String = row.try_get("scope")?;

        Ok(Self {
            uuid: StocktakeUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            auditor_name: row.try_get("auditor_name")?,
            completed_by: row.try_get("completed_by")?,
            scope: decode_str("scope", &scope)?,
            total_discrepancy: row.try_get("total_discrepancy")?,
            line_count: decode_u64("line_count", row.try_get("line_count")?)?,
            started_at: row.try_get::<SqlxTimestamp, _>("started_at")?.to_jiff(),
            completed_at: row.try_get::<SqlxTimestamp, _>("completed_at")?.to_jiff(),
        })
    }
}
