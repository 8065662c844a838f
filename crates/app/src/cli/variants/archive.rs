use clap::Args;
use uuid::Uuid;

use crate::cli::{Global, output};

#[derive(Debug, Args)]
pub(crate) struct ArchiveVariantArgs {
    /// Variant UUID
    variant: Uuid,
}

pub(crate) async fn run(args: ArchiveVariantArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    let variant = ctx
        .variants
        .archive_variant(args.variant.into())
        .await
        .map_err(|error| format!("failed to archive variant: {error}"))?;

    if global.json {
        return output::print_json(&variant);
    }

    println!("archived {} ({})", variant.sku, variant.label());

    Ok(())
}
