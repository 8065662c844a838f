use std::{fs, path::PathBuf};

use clap::Args;

use crate::cli::{Global, output};

use super::CountSheet;

#[derive(Debug, Args)]
pub(crate) struct ConfirmStocktakeArgs {
    /// Filled-in count sheet
    #[arg(long)]
    sheet: PathBuf,

    /// Staff member confirming the balance
    #[arg(long, env = "STOCKROOM_ACTOR")]
    actor: String,
}

pub(crate) async fn run(args: ConfirmStocktakeArgs, global: &Global) -> Result<(), String> {
    let raw = fs::read_to_string(&args.sheet)
        .map_err(|error| format!("failed to read {}: {error}", args.sheet.display()))?;

    let sheet: CountSheet = serde_norway::from_str(&raw)
        .map_err(|error| format!("invalid count sheet: {error}"))?;

    let draft = sheet.into_draft()?;

    let ctx = global.context().await?;

    let record = ctx
        .stocktakes
        .confirm_balance(draft, args.actor)
        .await
        .map_err(|error| format!("failed to confirm stocktake: {error}"))?;

    if global.json {
        return output::print_json(&record);
    }

    println!("stocktake_uuid: {}", record.uuid);
    println!("code: {}", record.stocktake.code());
    println!("total_discrepancy: {:+}", record.stocktake.total_discrepancy());

    if record.stocktake.discrepant_lines().next().is_some() {
        println!("{}", super::lines_table(record.stocktake.discrepant_lines()));
    }

    Ok(())
}
