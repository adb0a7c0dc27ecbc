use std::path::Path;

use pulse_core::entities::TaskId;
use pulse_core::enums::{TaskStatus, UserRole};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::upload::read_upload;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

#[derive(Serialize)]
struct AttachResponse {
    task: TaskId,
    file: String,
    uploaded: bool,
}

pub async fn complete(id: TaskId, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(None)?;
    let task = with_spinner("Completing task", ctx.board.complete(id)).await?;
    output(&task, flags.format)
}

pub async fn set_status(id: TaskId, raw: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(None)?;
    let status = parse_enum::<TaskStatus>(raw, "status")?;
    let task = with_spinner("Updating task", ctx.board.set_status(id, status)).await?;
    output(&task, flags.format)
}

pub async fn comment(id: TaskId, text: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(None)?;
    if text.trim().is_empty() {
        anyhow::bail!("comment text is empty");
    }
    let task = with_spinner("Saving comment", ctx.board.comment(id, text.trim())).await?;
    output(&task, flags.format)
}

pub async fn confirm(id: TaskId, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(Some(&[UserRole::Executor]))?;
    let task = with_spinner("Confirming deadline", ctx.board.confirm_on_time(id)).await?;
    output(&task, flags.format)
}

pub async fn extend(id: TaskId, comment: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(Some(&[UserRole::Executor]))?;
    let task = with_spinner("Requesting extension", ctx.board.request_extension(id, comment.trim())).await?;
    output(&task, flags.format)
}

pub async fn attach(id: TaskId, path: &Path, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(None)?;
    let upload = read_upload(path)?;
    with_spinner("Uploading", ctx.board.upload_attachment(id, &upload)).await?;
    output(
        &AttachResponse {
            task: id,
            file: upload.file_name,
            uploaded: true,
        },
        flags.format,
    )
}
