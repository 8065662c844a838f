use clap::{Args, Subcommand};
use stockroom::returns::ReturnKind;
use stockroom_app::domain::returns::records::ReturnRequestRecord;

use super::{Global, output};

mod list;
mod show;
mod transition;

#[derive(Debug, Args)]
pub(crate) struct ReturnsCommand {
    #[command(subcommand)]
    command: ReturnsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReturnsSubcommand {
    /// List return requests, newest first
    List(list::ListReturnsArgs),

    /// Show one return request
    Show(show::ShowReturnArgs),

    /// Approve a pending request
    Approve(transition::NotedArgs),

    /// Reject a pending request
    Reject(transition::RejectArgs),

    /// Record that the customer shipped the item back
    ShipBack(transition::NotedArgs),

    /// Record receipt of the returned item
    Receive(transition::TransitionArgs),

    /// Settle a received request
    Complete(transition::TransitionArgs),

    /// Cancel a pending request
    Cancel(transition::TransitionArgs),
}

pub(crate) async fn run(command: ReturnsCommand, global: &Global) -> Result<(), String> {
    match command.command {
        ReturnsSubcommand::List(args) => list::run(args, global).await,
        ReturnsSubcommand::Show(args) => show::run(args, global).await,
        ReturnsSubcommand::Approve(args) => transition::approve(args, global).await,
        ReturnsSubcommand::Reject(args) => transition::reject(args, global).await,
        ReturnsSubcommand::ShipBack(args) => transition::ship_back(args, global).await,
        ReturnsSubcommand::Receive(args) => transition::receive(args, global).await,
        ReturnsSubcommand::Complete(args) => transition::complete(args, global).await,
        ReturnsSubcommand::Cancel(args) => transition::cancel(args, global).await,
    }
}

fn wanted(kind: &ReturnKind) -> String {
    match kind {
        ReturnKind::Exchange(target) => format!("{}/{}", target.color, target.size),
        ReturnKind::Refund(refund) => refund.amount.to_string(),
    }
}

fn requests_table(requests: &[ReturnRequestRecord]) -> String {
    output::table(
        ["uuid", "code", "type", "status", "wants", "created"],
        requests.iter().map(|request| {
            [
                request.uuid.to_string(),
                request.request_code.clone(),
                request.kind.return_type().to_string(),
                request.status.to_string(),
                wanted(&request.kind),
                request.created_at.to_string(),
            ]
        }),
    )
}
