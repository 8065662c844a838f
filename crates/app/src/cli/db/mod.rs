use clap::{Args, Subcommand};

use super::Global;

mod migrate;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate,
}

pub(crate) async fn run(command: DbCommand, global: &Global) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate => migrate::run(global).await,
    }
}
