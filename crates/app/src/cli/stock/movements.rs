use clap::Args;
use uuid::Uuid;

use crate::cli::{Global, output};

#[derive(Debug, Args)]
pub(crate) struct ListMovementsArgs {
    /// Variant UUID
    variant: Uuid,
}

pub(crate) async fn run(args: ListMovementsArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    let movements = ctx
        .warehouse
        .list_movements(args.variant.into())
        .await
        .map_err(|error| format!("failed to list movements: {error}"))?;

    if global.json {
        return output::print_json(&movements);
    }

    if movements.is_empty() {
        println!("no movements recorded for variant {}", args.variant);
        return Ok(());
    }

    let table = output::table(
        ["when", "kind", "quantity", "stock after", "actor", "reference"],
        movements.iter().map(|movement| {
            [
                movement.created_at.to_string(),
                movement.kind.to_string(),
                movement.quantity.to_string(),
                movement.stock_after.to_string(),
                movement.actor.clone(),
                output::optional(movement.reference.as_deref()),
            ]
        }),
    );

    println!("{table}");

    Ok(())
}
