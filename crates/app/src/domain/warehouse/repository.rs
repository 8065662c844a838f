//! Warehouse Repository

use std::num::TryFromIntError;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use stockroom::ledger::{InsufficientStock, MovementKind, ensure_available};
use uuid::Uuid;

use crate::{
    database::{decode_str, decode_u64, encode_u64},
    domain::{
        variants::records::VariantUuid,
        warehouse::{
            data::NewMovementItem,
            records::{
                StockMovementItemRecord, StockMovementRecord, StockMovementUuid,
                VariantMovementRecord,
            },
        },
    },
};

const CREATE_MOVEMENT_SQL: &str = include_str!("sql/create_movement.sql");
const CREATE_MOVEMENT_ITEM_SQL: &str = include_str!("sql/create_movement_item.sql");
const APPLY_STOCK_DELTA_SQL: &str = include_str!("sql/apply_stock_delta.sql");
const LOCK_STOCK_LEVEL_SQL: &str = include_str!("sql/lock_stock_level.sql");
const LIST_VARIANT_MOVEMENTS_SQL: &str = include_str!("sql/list_variant_movements.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWarehouseRepository;

impl PgWarehouseRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Record a movement and apply its deltas inside `tx`.
    ///
    /// Every item is applied with a conditional update, so an issue larger than
    /// the stock on hand fails with [`InsufficientStock`] and leaves the caller's
    /// transaction to be rolled back.
    pub(crate) async fn record_movement<E>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: MovementKind,
        actor: &str,
        reference: Option<&str>,
        items: &[NewMovementItem],
    ) -> Result<StockMovementRecord, E>
    where
        E: From<sqlx::Error> + From<InsufficientStock> + From<TryFromIntError>,
    {
        let uuid = StockMovementUuid::new();

        let created_at: SqlxTimestamp = query_as::<Postgres, (SqlxTimestamp,)>(CREATE_MOVEMENT_SQL)
            .bind(uuid.into_uuid())
            .bind(kind.as_str())
            .bind(actor)
            .bind(reference)
            .fetch_one(&mut **tx)
            .await?
            .0;

        let mut recorded = Vec::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            let delta = kind.delta(item.quantity)?;

            let (sku, stock_after) = match self.apply_stock_delta(tx, item.variant, delta).await? {
                Some(applied) => applied,
                None => {
                    // Holding the row lock, the retry sees the same stock we check.
                    let (sku, available) = self.lock_stock_level(tx, item.variant).await?;

                    if kind == MovementKind::Issue {
                        ensure_available(&sku, available, item.quantity)?;
                    }

                    self.apply_stock_delta(tx, item.variant, delta)
                        .await?
                        .ok_or(InsufficientStock {
                            sku,
                            available,
                            requested: item.quantity,
                        })?
                }
            };

            query(CREATE_MOVEMENT_ITEM_SQL)
                .bind(uuid.into_uuid())
                .bind(i32::try_from(position)?)
                .bind(item.variant.into_uuid())
                .bind(encode_u64("quantity", item.quantity)?)
                .bind(encode_u64("stock_after", stock_after)?)
                .execute(&mut **tx)
                .await?;

            recorded.push(StockMovementItemRecord {
                variant_uuid: item.variant,
                sku,
                quantity: item.quantity,
                stock_after,
            });
        }

        Ok(StockMovementRecord {
            uuid,
            kind,
            actor: actor.to_string(),
            reference: reference.map(str::to_string),
            created_at: created_at.to_jiff(),
            items: recorded,
        })
    }

    /// Atomically add `delta` to a variant's stock unless the result would be
    /// negative. Returns the SKU and new stock, or `None` when the guard failed or
    /// the variant does not exist.
    async fn apply_stock_delta(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        delta: i64,
    ) -> Result<Option<(String, u64)>, sqlx::Error> {
        let row: Option<(String, i64)> = query_as(APPLY_STOCK_DELTA_SQL)
            .bind(variant.into_uuid())
            .bind(delta)
            .fetch_optional(&mut **tx)
            .await?;

        match row {
            Some((sku, stock)) => Ok(Some((sku, decode_u64("stock_quantity", stock)?))),
            None => Ok(None),
        }
    }

    /// Lock a variant row and read its stock. Fails with `RowNotFound` when the
    /// variant does not exist.
    async fn lock_stock_level(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<(String, u64), sqlx::Error> {
        let (sku, stock): (String, i64) = query_as(LOCK_STOCK_LEVEL_SQL)
            .bind(variant.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok((sku, decode_u64("stock_quantity", stock)?))
    }

    pub(crate) async fn list_variant_movements(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<Vec<VariantMovementRecord>, sqlx::Error> {
        query_as::<Postgres, VariantMovementRecord>(LIST_VARIANT_MOVEMENTS_SQL)
            .bind(variant.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for VariantMovementRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;
        let movement_uuid: Uuid = row.try_get("movement_uuid")?;

        Ok(Self {
            movement_uuid: StockMovementUuid::from_uuid(movement_uuid),
            kind: decode_str("kind", &kind)?,
            actor: row.try_get("actor")?,
            reference: row.try_get("reference")?,
            quantity: decode_u64("quantity", row.try_get("quantity")?)?,
            stock_after: decode_u64("stock_after", row.try_get("stock_after")?)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
