use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// Monthly KPI for you or one of your executors.
    Monthly(ReportMonthlyArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ReportMonthlyArgs {
    /// Month as YYYY-MM.
    #[arg(long)]
    pub month: String,
    /// Executor id; defaults to yourself.
    #[arg(long)]
    pub user: Option<i64>,
    /// Save the CSV export to this path instead of printing KPI.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
