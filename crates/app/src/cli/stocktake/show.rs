use clap::Args;
use uuid::Uuid;

use crate::cli::{Global, output};

#[derive(Debug, Args)]
pub(crate) struct ShowStocktakeArgs {
    /// Stocktake UUID
    stocktake: Uuid,
}

pub(crate) async fn run(args: ShowStocktakeArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    let record = ctx
        .stocktakes
        .get_stocktake(args.stocktake.into())
        .await
        .map_err(|error| format!("failed to get stocktake: {error}"))?;

    if global.json {
        return output::print_json(&record);
    }

    let stocktake = &record.stocktake;

    println!("code: {}", stocktake.code());
    println!("auditor: {}", stocktake.auditor_name());
    println!("confirmed_by: {}", stocktake.completed_by());
    println!("scope: {}", stocktake.scope());
    println!("started_at: {}", record.started_at);
    println!("completed_at: {}", stocktake.completed_at());
    println!("total_discrepancy: {:+}", stocktake.total_discrepancy());
    println!("{}", super::lines_table(stocktake.lines()));

    Ok(())
}
