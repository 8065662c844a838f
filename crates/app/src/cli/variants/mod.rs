use clap::{Args, Subcommand};
use stockroom_app::domain::variants::records::VariantRecord;

use super::{Global, output};

mod archive;
mod generate;
mod list;

#[derive(Debug, Args)]
pub(crate) struct VariantsCommand {
    #[command(subcommand)]
    command: VariantsSubcommand,
}

#[derive(Debug, Subcommand)]
enum VariantsSubcommand {
    /// List every variant of a product
    List(list::ListVariantsArgs),

    /// Create the missing colour/size combinations of a product
    Generate(generate::GenerateVariantsArgs),

    /// Archive a variant
    Archive(archive::ArchiveVariantArgs),
}

pub(crate) async fn run(command: VariantsCommand, global: &Global) -> Result<(), String> {
    match command.command {
        VariantsSubcommand::List(args) => list::run(args, global).await,
        VariantsSubcommand::Generate(args) => generate::run(args, global).await,
        VariantsSubcommand::Archive(args) => archive::run(args, global).await,
    }
}

fn variants_table(variants: &[VariantRecord]) -> String {
    output::table(
        ["uuid", "sku", "variant", "stock", "status", "image"],
        variants.iter().map(|variant| {
            [
                variant.uuid.to_string(),
                variant.sku.clone(),
                variant.label(),
                variant.stock_quantity.to_string(),
                variant.status.to_string(),
                output::optional(variant.image_url.as_deref()),
            ]
        }),
    )
}
