use clap::Args;
use stockroom::returns::ReturnKind;
use uuid::Uuid;

use crate::cli::{Global, output};

#[derive(Debug, Args)]
pub(crate) struct ShowReturnArgs {
    /// Return request UUID
    request: Uuid,
}

pub(crate) async fn run(args: ShowReturnArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    let request = ctx
        .returns
        .get_return_request(args.request.into())
        .await
        .map_err(|error| format!("failed to get return request: {error}"))?;

    if global.json {
        return output::print_json(&request);
    }

    println!("request_uuid: {}", request.uuid);
    println!("request_code: {}", request.request_code);
    println!("order_item_uuid: {}", request.order_item_uuid);
    println!("status: {}", request.status);
    println!("reason: {}", request.reason);

    match &request.kind {
        ReturnKind::Exchange(target) => {
            println!("exchange_to: {}/{}", target.color, target.size);
        }
        ReturnKind::Refund(refund) => {
            println!("refund_amount: {}", refund.amount);
            println!(
                "bank: {} {} ({})",
                refund.bank.bank_name, refund.bank.account_number, refund.bank.account_holder
            );
        }
    }

    for image in &request.evidence_images {
        println!("evidence: {image}");
    }

    println!("admin_notes: {}", output::optional(request.admin_notes.as_deref()));
    println!(
        "rejection_reason: {}",
        output::optional(request.rejection_reason.as_deref())
    );
    println!(
        "settlement: {}",
        request
            .settlement
            .map_or_else(|| "-".to_string(), |settlement| settlement.to_string())
    );
    println!("processed_by: {}", output::optional(request.processed_by.as_deref()));
    println!(
        "processed_at: {}",
        request
            .processed_at
            .map_or_else(|| "-".to_string(), |at| at.to_string())
    );

    Ok(())
}
