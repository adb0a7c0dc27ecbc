use pulse_client::wire::NewTask;
use pulse_core::enums::{TaskPriority, UserRole};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::task::TaskCreateArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

pub async fn run(args: &TaskCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(Some(&[UserRole::Creator]))?;

    let due_at = args
        .due
        .as_deref()
        .map(|raw| {
            chrono::DateTime::parse_from_rfc3339(raw.trim())
                .map(|due| due.to_rfc3339())
                .map_err(|_| anyhow::anyhow!("invalid due date '{raw}': expected RFC 3339"))
        })
        .transpose()?;

    let task = NewTask {
        title: args.title.trim().to_string(),
        description: args.description.clone(),
        priority: parse_enum::<TaskPriority>(&args.priority, "priority")?,
        due_at,
        assignee: args.assignee,
    };
    let created = with_spinner("Creating task", ctx.board.create(&task)).await?;
    output(&created, flags.format)
}
