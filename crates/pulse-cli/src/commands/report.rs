use anyhow::Context;
use pulse_core::entities::{ReportSubject, parse_month};
use pulse_core::enums::UserRole;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReportCommands;
use crate::cli::subcommands::report::ReportMonthlyArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

#[derive(Serialize)]
struct CsvSaved {
    path: String,
    bytes: usize,
}

#[derive(Serialize)]
struct MonthlySummary {
    month: String,
    user_id: i64,
    total: u32,
    done: u32,
    done_on_time: u32,
    done_late: u32,
    /// Percentage of done tasks finished on time.
    on_time_rate: Option<String>,
}

/// Handle `pulse report <subcommand>`.
pub async fn handle(action: &ReportCommands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ReportCommands::Monthly(args) => monthly(args, ctx, flags).await,
    }
}

async fn monthly(args: &ReportMonthlyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let subject = match args.user {
        Some(id) => {
            ctx.require(Some(&[UserRole::Creator]))?;
            ReportSubject::User(id)
        }
        None => {
            ctx.require(None)?;
            ReportSubject::Me
        }
    };
    let month = parse_month(&args.month)?;

    if let Some(path) = &args.csv {
        let bytes = with_spinner("Downloading report", ctx.client.monthly_report_csv(&month, subject)).await?;
        std::fs::write(path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
        return output(
            &CsvSaved {
                path: path.display().to_string(),
                bytes: bytes.len(),
            },
            flags.format,
        );
    }

    let kpi = with_spinner("Loading report", ctx.client.monthly_report(&month, subject)).await?;
    if flags.format != crate::cli::OutputFormat::Table {
        return output(&kpi, flags.format);
    }
    let summary = MonthlySummary {
        on_time_rate: kpi.on_time_rate().map(|rate| format!("{rate:.0}%")),
        month: kpi.month,
        user_id: kpi.user_id,
        total: kpi.total,
        done: kpi.done,
        done_on_time: kpi.done_on_time,
        done_late: kpi.done_late,
    };
    output(&summary, flags.format)
}
