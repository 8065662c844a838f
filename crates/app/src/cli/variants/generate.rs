use clap::Args;
use stockroom::variants::generator::AttributeSelection;
use uuid::Uuid;

use crate::cli::{Global, output};

#[derive(Debug, Args)]
pub(crate) struct GenerateVariantsArgs {
    /// Product UUID
    product: Uuid,

    /// Colours to combine, comma separated
    #[arg(long, value_delimiter = ',')]
    colors: Vec<String>,

    /// Sizes to combine, comma separated
    #[arg(long, value_delimiter = ',')]
    sizes: Vec<String>,
}

pub(crate) async fn run(args: GenerateVariantsArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    let selections = vec![
        AttributeSelection::new("Color", args.colors),
        AttributeSelection::new("Size", args.sizes),
    ];

    let report = ctx
        .variants
        .generate_variants(args.product.into(), selections)
        .await
        .map_err(|error| format!("failed to generate variants: {error}"))?;

    if global.json {
        return output::print_json(&report);
    }

    println!("outcome: {:?}", report.outcome());

    if !report.created.is_empty() {
        println!("{}", super::variants_table(&report.created));
    }

    for duplicate in &report.duplicates {
        println!("skipped existing: {duplicate}");
    }

    Ok(())
}
