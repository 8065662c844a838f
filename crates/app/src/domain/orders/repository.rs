//! Orders Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::decode_u64,
    domain::{
        orders::records::{OrderItemRecord, OrderItemUuid, OrderUuid},
        products::records::ProductUuid,
        variants::records::VariantUuid,
    },
};

const GET_ORDER_ITEM_SQL: &str = include_str!("sql/get_order_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: OrderItemUuid,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(GET_ORDER_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            quantity: decode_u64("quantity", row.try_get("quantity")?)?,
            unit_price: decode_u64("unit_price", row.try_get("unit_price")?)?,
            size: row.try_get("size")?,
            color: row.try_get("color")?,
        })
    }
}
