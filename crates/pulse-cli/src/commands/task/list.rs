use pulse_core::enums::{SortDirection, SortField, StatusFilter, UserRole};
use pulse_core::projection::{TaskFilters, TaskQuery, TaskSort};
use pulse_config::GeneralConfig;
use pulse_sync::TaskRow;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::task::TaskListArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

#[derive(Debug, Serialize)]
struct TaskListRow {
    id: i64,
    title: String,
    status: &'static str,
    priority: &'static str,
    due_at: Option<String>,
    /// Assignee for creators, task author for executors.
    with: String,
    position: String,
}

impl From<TaskRow> for TaskListRow {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.task.id,
            status: row.task.status.as_str(),
            priority: row.task.priority.as_str(),
            due_at: row.task.due_at,
            title: row.task.title,
            with: row.counterparty.name,
            position: row.counterparty.position,
        }
    }
}

pub async fn run(args: &TaskListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let role = ctx.require_role()?;
    let filters = filters_from(args, role)?;
    let query = query_from(args, &ctx.config.general)?;

    let rows = with_spinner("Loading tasks", ctx.board.view(&filters, &query)).await?;
    let rows: Vec<TaskListRow> = rows.into_iter().map(TaskListRow::from).collect();
    output(&rows, flags.format)
}

fn filters_from(args: &TaskListArgs, role: UserRole) -> anyhow::Result<TaskFilters> {
    let status = args
        .status
        .as_deref()
        .map(|raw| parse_enum::<StatusFilter>(raw, "status"))
        .transpose()?
        .unwrap_or_default();

    if role == UserRole::Executor && (args.only_mine || args.assignee.is_some()) {
        tracing::warn!("--only-mine and --assignee only apply to creators; ignoring");
    }

    Ok(TaskFilters {
        status,
        only_mine: args.only_mine,
        assignee: args.assignee,
    })
}

fn query_from(args: &TaskListArgs, general: &GeneralConfig) -> anyhow::Result<TaskQuery> {
    let field = match args.sort.as_deref() {
        Some(raw) => Some(parse_enum::<SortField>(raw, "sort field")?),
        None => general.default_sort,
    };
    let direction = if args.desc {
        SortDirection::Desc
    } else if args.sort.is_some() {
        SortDirection::Asc
    } else {
        general.default_direction
    };

    Ok(TaskQuery {
        search: args.search.clone().unwrap_or_default(),
        sort: field.map(|field| TaskSort { field, direction }),
    })
}
