use pulse_core::enums::UserRole;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ExecutorCommands;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

#[derive(Serialize)]
struct ExecutorRow {
    id: i64,
    name: String,
    email: String,
    position: Option<String>,
}

#[derive(Serialize)]
struct InviteResponse {
    invited: String,
    detail: Option<String>,
}

/// Handle `pulse executor <subcommand>`.
pub async fn handle(action: &ExecutorCommands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(Some(&[UserRole::Creator]))?;

    match action {
        ExecutorCommands::List => {
            let executors = with_spinner("Loading executors", ctx.board.executors()).await?;
            let rows: Vec<ExecutorRow> = executors
                .iter()
                .map(|executor| ExecutorRow {
                    id: executor.id,
                    name: executor.display_name().to_string(),
                    email: executor.email.clone(),
                    position: executor.position.clone(),
                })
                .collect();
            output(&rows, flags.format)
        }
        ExecutorCommands::Invite { email } => {
            let email = email.trim();
            if email.is_empty() {
                anyhow::bail!("email is required");
            }
            let detail = with_spinner("Sending invitation", ctx.board.invite_executor(email)).await?;
            output(
                &InviteResponse {
                    invited: email.to_string(),
                    detail,
                },
                flags.format,
            )
        }
    }
}
