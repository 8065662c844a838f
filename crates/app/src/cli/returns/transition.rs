use clap::Args;
use stockroom_app::domain::returns::{ReturnsServiceError, records::ReturnRequestRecord};
use uuid::Uuid;

use crate::cli::{Global, output};

#[derive(Debug, Args)]
pub(crate) struct TransitionArgs {
    /// Return request UUID
    request: Uuid,

    /// Staff member performing the change
    #[arg(long, env = "STOCKROOM_ACTOR")]
    actor: String,
}

#[derive(Debug, Args)]
pub(crate) struct NotedArgs {
    #[command(flatten)]
    transition: TransitionArgs,

    /// Note appended to the request's admin notes
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct RejectArgs {
    #[command(flatten)]
    transition: TransitionArgs,

    /// Reason shown to the customer
    #[arg(long)]
    reason: String,
}

pub(crate) async fn approve(args: NotedArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;
    let TransitionArgs { request, actor } = args.transition;

    report(ctx.returns.approve(request.into(), args.notes, actor).await, global)
}

pub(crate) async fn reject(args: RejectArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;
    let TransitionArgs { request, actor } = args.transition;

    report(ctx.returns.reject(request.into(), args.reason, actor).await, global)
}

pub(crate) async fn ship_back(args: NotedArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;
    let TransitionArgs { request, actor } = args.transition;

    report(
        ctx.returns
            .mark_shipped_back(request.into(), args.notes, actor)
            .await,
        global,
    )
}

pub(crate) async fn receive(args: TransitionArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    report(
        ctx.returns
            .confirm_received(args.request.into(), args.actor)
            .await,
        global,
    )
}

pub(crate) async fn complete(args: TransitionArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    report(ctx.returns.complete(args.request.into(), args.actor).await, global)
}

pub(crate) async fn cancel(args: TransitionArgs, global: &Global) -> Result<(), String> {
    let ctx = global.context().await?;

    report(ctx.returns.cancel(args.request.into(), args.actor).await, global)
}

fn report(
    result: Result<ReturnRequestRecord, ReturnsServiceError>,
    global: &Global,
) -> Result<(), String> {
    let request = result.map_err(|error| format!("failed to update return request: {error}"))?;

    if global.json {
        return output::print_json(&request);
    }

    println!("{} is now {}", request.request_code, request.status);

    if let Some(settlement) = request.settlement {
        println!("settlement: {settlement}");
    }

    Ok(())
}
