use pulse_core::chat::{MessageDraft, ThreadEntry};

use super::{ChatLine, open_thread};
use crate::cli::GlobalFlags;
use crate::cli::subcommands::chat::{ChatSendArgs, ChatThreadArgs};
use crate::commands::shared::upload::read_upload;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

pub async fn run(args: &ChatSendArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let thread = open_thread(
        &ChatThreadArgs {
            peer: args.peer,
            task: args.task,
        },
        ctx,
    )?;

    let mut draft = MessageDraft::text(args.peer, args.text.clone().unwrap_or_default());
    if let Some(path) = &args.file {
        draft = draft.with_file(read_upload(path)?);
    }

    let sent = with_spinner("Sending", thread.send(draft)).await?;
    let entry = ThreadEntry {
        message: sent,
        is_mine: true,
    };
    output(&ChatLine::from(&entry), flags.format)
}
