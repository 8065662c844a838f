use std::{fs, path::PathBuf};

use clap::Args;
use stockroom::stocktakes::StocktakeScope;

use crate::cli::Global;

use super::CountSheet;

#[derive(Debug, Args)]
pub(crate) struct StartStocktakeArgs {
    /// Auditor responsible for the count
    #[arg(long)]
    auditor: String,

    /// `all` or `product:<uuid>`
    #[arg(long, default_value = "all")]
    scope: StocktakeScope,

    /// Write the sheet here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) async fn run(args: StartStocktakeArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    let draft = ctx
        .stocktakes
        .start_stocktake(args.auditor, args.scope)
        .await
        .map_err(|error| format!("failed to start stocktake: {error}"))?;

    let sheet = CountSheet::from_draft(&draft)?;

    let yaml = serde_norway::to_string(&sheet)
        .map_err(|error| format!("failed to encode count sheet: {error}"))?;

    match args.output {
        Some(path) => {
            fs::write(&path, yaml)
                .map_err(|error| format!("failed to write {}: {error}", path.display()))?;

            println!(
                "wrote {} lines to {}; edit the counts, then run `stockroom stocktake confirm`",
                draft.lines().len(),
                path.display()
            );
        }
        None => print!("{yaml}"),
    }

    Ok(())
}
