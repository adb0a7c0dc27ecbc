mod create;
mod list;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

/// Handle `pulse task <subcommand>`.
pub async fn handle(action: &TaskCommands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        TaskCommands::List(args) => list::run(args, ctx, flags).await,
        TaskCommands::Get { id } => {
            ctx.require(None)?;
            let task = with_spinner("Loading task", ctx.board.task(*id)).await?;
            output(&task, flags.format)
        }
        TaskCommands::Create(args) => create::run(args, ctx, flags).await,
        TaskCommands::Complete { id } => update::complete(*id, ctx, flags).await,
        TaskCommands::Status { id, status } => update::set_status(*id, status, ctx, flags).await,
        TaskCommands::Comment { id, text } => update::comment(*id, text, ctx, flags).await,
        TaskCommands::Confirm { id } => update::confirm(*id, ctx, flags).await,
        TaskCommands::Extend { id, comment } => update::extend(*id, comment, ctx, flags).await,
        TaskCommands::Attach { id, path } => update::attach(*id, path, ctx, flags).await,
    }
}
