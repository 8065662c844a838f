//! Test Helpers
//!
//! Products and orders belong to other systems, so tests seed them with plain
//! SQL.

use sqlx::query;

use crate::{
    database::{decode_u64, encode_u64},
    domain::{
        orders::records::{OrderItemUuid, OrderUuid},
        products::records::ProductUuid,
        variants::records::VariantUuid,
    },
    test::TestContext,
};

/// Product with thumbnail `https://cdn.example.com/{code}.jpg`.
pub(crate) async fn create_product(
    ctx: &TestContext,
    code: &str,
    name: &str,
) -> Result<ProductUuid, sqlx::Error> {
    let uuid = ProductUuid::new();

    query("INSERT INTO products (uuid, code, name, thumbnail_url) VALUES ($1, $2, $3, $4)")
        .bind(uuid.into_uuid())
        .bind(code)
        .bind(name)
        .bind(format!("https://cdn.example.com/{code}.jpg"))
        .execute(ctx.db.pool())
        .await?;

    Ok(uuid)
}

pub(crate) async fn create_variant(
    ctx: &TestContext,
    product: ProductUuid,
    sku: &str,
    color: &str,
    size: &str,
    stock: u64,
) -> Result<VariantUuid, sqlx::Error> {
    let uuid = VariantUuid::new();

    query(
        "INSERT INTO product_variants (uuid, product_uuid, sku, color, size, stock_quantity) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(uuid.into_uuid())
    .bind(product.into_uuid())
    .bind(sku)
    .bind(color)
    .bind(size)
    .bind(encode_u64("stock_quantity", stock)?)
    .execute(ctx.db.pool())
    .await?;

    Ok(uuid)
}

/// One-line order for `quantity` units of `variant`.
pub(crate) async fn create_order_item(
    ctx: &TestContext,
    product: ProductUuid,
    variant: VariantUuid,
    quantity: u64,
    unit_price: u64,
) -> Result<OrderItemUuid, sqlx::Error> {
    let order = OrderUuid::new();
    let item = OrderItemUuid::new();

    query("INSERT INTO orders (uuid, order_number, customer_name) VALUES ($1, $2, $3)")
        .bind(order.into_uuid())
        .bind(format!("ORD-{}", order.into_uuid().simple()))
        .bind("Nguyen Van A")
        .execute(ctx.db.pool())
        .await?;

    query(
        "INSERT INTO order_items (uuid, order_uuid, product_uuid, variant_uuid, quantity, unit_price, size, color) \
         SELECT $1, $2, $3, uuid, $5, $6, size, color FROM product_variants WHERE uuid = $4",
    )
    .bind(item.into_uuid())
    .bind(order.into_uuid())
    .bind(product.into_uuid())
    .bind(variant.into_uuid())
    .bind(encode_u64("quantity", quantity)?)
    .bind(encode_u64("unit_price", unit_price)?)
    .execute(ctx.db.pool())
    .await?;

    Ok(item)
}

pub(crate) async fn stock_of(ctx: &TestContext, variant: VariantUuid) -> Result<u64, sqlx::Error> {
    let stock: i64 = sqlx::query_scalar("SELECT stock_quantity FROM product_variants WHERE uuid = $1")
        .bind(variant.into_uuid())
        .fetch_one(ctx.db.pool())
        .await?;

    decode_u64("stock_quantity", stock)
}
