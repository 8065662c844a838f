use clap::Args;
use stockroom::returns::ReturnStatus;

use crate::cli::{Global, output};

#[derive(Debug, Args)]
pub(crate) struct ListReturnsArgs {
    /// Only requests in this status (e.g. PENDING)
    #[arg(long)]
    status: Option<ReturnStatus>,
}

pub(crate) async fn run(args: ListReturnsArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    let requests = ctx
        .returns
        .list_return_requests(args.status)
        .await
        .map_err(|error| format!("failed to list return requests: {error}"))?;

    if global.json {
        return output::print_json(&requests);
    }

    if requests.is_empty() {
        println!("no return requests found");
        return Ok(());
    }

    println!("{}", super::requests_table(&requests));

    Ok(())
}
