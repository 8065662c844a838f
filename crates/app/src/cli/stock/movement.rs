use clap::Args;
use stockroom_app::domain::warehouse::{
    WarehouseServiceError,
    data::{NewMovementItem, NewStockMovement},
    records::StockMovementRecord,
};
use uuid::Uuid;

use crate::cli::{Global, output};

#[derive(Debug, Args)]
pub(crate) struct MovementArgs {
    /// `<variant-uuid>=<quantity>`, repeatable
    #[arg(long = "item", required = true, value_parser = parse_item)]
    items: Vec<NewMovementItem>,

    /// Staff member recording the movement
    #[arg(long, env = "STOCKROOM_ACTOR")]
    actor: String,

    /// Delivery note, order number or similar
    #[arg(long)]
    reference: Option<String>,
}

impl From<MovementArgs> for NewStockMovement {
    fn from(args: MovementArgs) -> Self {
        Self {
            actor: args.actor,
            reference: args.reference,
            items: args.items,
        }
    }
}

pub(crate) async fn entry(args: MovementArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    report(ctx.warehouse.create_stock_entry(args.into()).await, global)
}

pub(crate) async fn issue(args: MovementArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    report(ctx.warehouse.create_stock_issue(args.into()).await, global)
}

fn report(
    result: Result<StockMovementRecord, WarehouseServiceError>,
    global: &Global,
) -> Result<(), String> {
    let movement = result.map_err(|error| format!("failed to record stock movement: {error}"))?;

    if global.json {
        return output::print_json(&movement);
    }

    println!("{} {} by {}", movement.kind, movement.uuid, movement.actor);

    let table = output::table(
        ["sku", "quantity", "stock after"],
        movement.items.iter().map(|item| {
            [
                item.sku.clone(),
                item.quantity.to_string(),
                item.stock_after.to_string(),
            ]
        }),
    );

    println!("{table}");

    Ok(())
}

fn parse_item(raw: &str) -> Result<NewMovementItem, String> {
    let (variant, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <variant-uuid>=<quantity>, got `{raw}`"))?;

    let variant = Uuid::parse_str(variant.trim())
        .map_err(|error| format!("invalid variant uuid `{variant}`: {error}"))?;

    let quantity = quantity
        .trim()
        .parse()
        .map_err(|error| format!("invalid quantity `{quantity}`: {error}"))?;

    Ok(NewMovementItem {
        variant: variant.into(),
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_parse_from_variant_and_quantity() {
        let variant = Uuid::now_v7();

        let item = parse_item(&format!("{variant}=3"));

        assert_eq!(
            item,
            Ok(NewMovementItem {
                variant: variant.into(),
                quantity: 3,
            })
        );
    }

    #[test]
    fn malformed_items_are_rejected() {
        assert!(parse_item("no-separator").is_err());
        assert!(parse_item("not-a-uuid=3").is_err());
        assert!(parse_item(&format!("{}=-1", Uuid::now_v7())).is_err());
    }
}
