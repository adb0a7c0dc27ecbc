use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// List tasks, optionally searched and sorted.
    List(TaskListArgs),
    /// Show one task.
    Get { id: i64 },
    /// Create a task (creators).
    Create(TaskCreateArgs),
    /// Mark a task done.
    Complete { id: i64 },
    /// Set a task's status.
    Status { id: i64, status: String },
    /// Leave an executor comment.
    Comment { id: i64, text: String },
    /// Confirm the deadline will be met (executors).
    Confirm { id: i64 },
    /// Ask for one more day (executors).
    Extend {
        id: i64,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Upload a file to a task.
    Attach { id: i64, path: PathBuf },
}

#[derive(Clone, Debug, Default, Args)]
pub struct TaskListArgs {
    /// Case-insensitive text search over title, description, and counterparty.
    #[arg(long)]
    pub search: Option<String>,
    /// Sort by: counterparty, position, title, description, priority, due-at, status
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending.
    #[arg(long)]
    pub desc: bool,
    /// Server-side status filter: all, new, in-progress, done, overdue
    #[arg(long)]
    pub status: Option<String>,
    /// Only tasks you created (creators).
    #[arg(long)]
    pub only_mine: bool,
    /// Only tasks assigned to this executor (creators).
    #[arg(long)]
    pub assignee: Option<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct TaskCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// low, medium, high
    #[arg(long, default_value = "medium")]
    pub priority: String,
    /// Deadline, RFC 3339.
    #[arg(long)]
    pub due: Option<String>,
    /// Executor id.
    #[arg(long)]
    pub assignee: Option<i64>,
}
