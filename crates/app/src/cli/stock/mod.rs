use clap::{Args, Subcommand};

use super::Global;

mod movement;
mod movements;

#[derive(Debug, Args)]
pub(crate) struct StockCommand {
    #[command(subcommand)]
    command: StockSubcommand,
}

#[derive(Debug, Subcommand)]
enum StockSubcommand {
    /// Record goods received into the warehouse
    Entry(movement::MovementArgs),

    /// Record goods leaving the warehouse
    Issue(movement::MovementArgs),

    /// Show the movement history of one variant
    Movements(movements::ListMovementsArgs),
}

pub(crate) async fn run(command: StockCommand, global: &Global) -> Result<(), String> {
    match command.command {
        StockSubcommand::Entry(args) => movement::entry(args, global).await,
        StockSubcommand::Issue(args) => movement::issue(args, global).await,
        StockSubcommand::Movements(args) => movements::run(args, global).await,
    }
}
