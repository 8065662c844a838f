use clap::Args;
use uuid::Uuid;

use crate::cli::{Global, output};

#[derive(Debug, Args)]
pub(crate) struct ListVariantsArgs {
    /// Product UUID
    product: Uuid,
}

pub(crate) async fn run(args: ListVariantsArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    let variants = ctx
        .variants
        .list_variants(args.product.into())
        .await
        .map_err(|error| format!("failed to list variants: {error}"))?;

    if global.json {
        return output::print_json(&variants);
    }

    if variants.is_empty() {
        println!("no variants found for product {}", args.product);
        return Ok(());
    }

    println!("{}", super::variants_table(&variants));

    Ok(())
}
