use clap::{Args, Subcommand};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use stockroom::stocktakes::{StocktakeDraft, StocktakeLine, StocktakeScope};
use uuid::Uuid;

use super::{Global, output};

mod confirm;
mod history;
mod show;
mod start;

#[derive(Debug, Args)]
pub(crate) struct StocktakeCommand {
    #[command(subcommand)]
    command: StocktakeSubcommand,
}

#[derive(Debug, Subcommand)]
enum StocktakeSubcommand {
    /// Snapshot current stock into a YAML count sheet
    Start(start::StartStocktakeArgs),

    /// Reconcile a filled-in count sheet into the ledger
    Confirm(confirm::ConfirmStocktakeArgs),

    /// List completed stocktakes, newest first
    History,

    /// Show one completed stocktake
    Show(show::ShowStocktakeArgs),
}

pub(crate) async fn run(command: StocktakeCommand, global: &Global) -> Result<(), String> {
    match command.command {
        StocktakeSubcommand::Start(args) => start::run(args, global).await,
        StocktakeSubcommand::Confirm(args) => confirm::run(args, global).await,
        StocktakeSubcommand::History => history::run(global).await,
        StocktakeSubcommand::Show(args) => show::run(args, global).await,
    }
}

/// Count sheet exchanged with the people counting.
///
/// It carries the whole draft: the id, so one sheet can only be confirmed once,
/// and each line's `system` stock as snapshotted by `stocktake start`. Only
/// `actual` is meant to be edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CountSheet {
    pub(crate) draft_id: Uuid,
    pub(crate) auditor: String,
    pub(crate) scope: String,
    pub(crate) started_at: Timestamp,
    pub(crate) lines: Vec<SheetLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SheetLine {
    pub(crate) sku: String,
    pub(crate) variant: Uuid,
    pub(crate) product: String,
    pub(crate) label: String,
    pub(crate) system: u64,
    pub(crate) actual: i64,
}

impl CountSheet {
    pub(crate) fn from_draft(draft: &StocktakeDraft) -> Result<Self, String> {
        let lines = draft
            .lines()
            .iter()
            .map(|line| {
                let actual = i64::try_from(line.actual_stock())
                    .map_err(|error| format!("stock of {} is out of range: {error}", line.sku()))?;

                Ok(SheetLine {
                    sku: line.sku().to_string(),
                    variant: line.variant(),
                    product: line.product_name().to_string(),
                    label: line.variant_name().to_string(),
                    system: line.system_stock(),
                    actual,
                })
            })
            .collect::<Result<_, String>>()?;

        Ok(Self {
            draft_id: draft.id(),
            auditor: draft.auditor_name().to_string(),
            scope: draft.scope().to_string(),
            started_at: draft.started_at(),
            lines,
        })
    }

    /// Rebuild the draft the sheet was written from and apply its counts.
    pub(crate) fn into_draft(self) -> Result<StocktakeDraft, String> {
        let scope: StocktakeScope = self
            .scope
            .parse()
            .map_err(|error| format!("invalid count sheet: {error}"))?;

        let counts: Vec<(String, i64)> = self
            .lines
            .iter()
            .map(|line| (line.sku.clone(), line.actual))
            .collect();

        let snapshot = self.lines.into_iter().map(|line| {
            StocktakeLine::snapshot(line.variant, line.product, line.label, line.sku, line.system)
        });

        let mut draft =
            StocktakeDraft::resume(self.draft_id, &self.auditor, scope, self.started_at, snapshot)
                .map_err(|error| format!("invalid count sheet: {error}"))?;

        draft
            .apply_counts(counts.iter().map(|(sku, count)| (sku.as_str(), *count)))
            .map_err(|error| format!("invalid count sheet: {error}"))?;

        Ok(draft)
    }
}

fn lines_table<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a StocktakeLine>,
{
    output::table(
        ["sku", "product", "variant", "system", "actual", "discrepancy"],
        lines.into_iter().map(|line| {
            [
                line.sku().to_string(),
                line.product_name().to_string(),
                line.variant_name().to_string(),
                line.system_stock().to_string(),
                line.actual_stock().to_string(),
                format!("{:+}", line.discrepancy()),
            ]
        }),
    )
}
