use crate::cli::{Global, output};

pub(crate) async fn run(global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    let stocktakes = ctx
        .stocktakes
        .list_stocktakes()
        .await
        .map_err(|error| format!("failed to list stocktakes: {error}"))?;

    if global.json {
        return output::print_json(&stocktakes);
    }

    if stocktakes.is_empty() {
        println!("no stocktakes recorded");
        return Ok(());
    }

    let table = output::table(
        ["uuid", "code", "auditor", "confirmed by", "scope", "lines", "discrepancy", "completed"],
        stocktakes.iter().map(|stocktake| {
            [
                stocktake.uuid.to_string(),
                stocktake.code.clone(),
                stocktake.auditor_name.clone(),
                stocktake.completed_by.clone(),
                stocktake.scope.to_string(),
                stocktake.line_count.to_string(),
                format!("{:+}", stocktake.total_discrepancy),
                stocktake.completed_at.to_string(),
            ]
        }),
    );

    println!("{table}");

    Ok(())
}
