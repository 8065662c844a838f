use clap::{Parser, Subcommand};
use stockroom_app::{context::AppContext, observability::LoggingConfig};

mod db;
mod output;
mod returns;
mod stock;
mod stocktake;
mod variants;

#[derive(Debug, Parser)]
#[command(name = "stockroom", about = "Stockroom back-office CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Variants(variants::VariantsCommand),
    Returns(returns::ReturnsCommand),
    Stocktake(stocktake::StocktakeCommand),
    Stock(stock::StockCommand),
}

/// Options shared by every subcommand.
pub(crate) struct Global {
    database_url: String,
    pub(crate) json: bool,
}

impl Global {
    pub(crate) async fn context(&self) -> Result<AppContext, String> {
        AppContext::from_database_url(&self.database_url)
            .await
            .map_err(|error| format!("{error}: {}", error_source(&error)))
    }

    pub(crate) fn database_url(&self) -> &str {
        &self.database_url
    }
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let global = Global {
            database_url: self
                .database_url
                .ok_or_else(|| "DATABASE_URL is not set; pass --database-url".to_string())?,
            json: self.json,
        };

        match self.command {
            Commands::Db(command) => db::run(command, &global).await,
            Commands::Variants(command) => variants::run(command, &global).await,
            Commands::Returns(command) => returns::run(command, &global).await,
            Commands::Stocktake(command) => stocktake::run(command, &global).await,
            Commands::Stock(command) => stock::run(command, &global).await,
        }
    }
}

fn error_source(error: &dyn std::error::Error) -> String {
    error
        .source()
        .map_or_else(String::new, ToString::to_string)
}
