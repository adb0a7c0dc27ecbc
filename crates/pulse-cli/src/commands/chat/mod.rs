mod send;
mod watch;

use std::sync::Arc;

use pulse_client::PulseClient;
use pulse_core::chat::ThreadEntry;
use serde::Serialize;

use crate::cli::subcommands::ChatCommands;
use crate::cli::subcommands::chat::ChatThreadArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

type Thread = pulse_sync::ChatThread<PulseClient>;

/// One rendered message.
#[derive(Debug, Serialize)]
pub(crate) struct ChatLine {
    id: i64,
    at: String,
    from: String,
    mine: bool,
    task: Option<i64>,
    text: String,
    file: Option<String>,
}

impl From<&ThreadEntry> for ChatLine {
    fn from(entry: &ThreadEntry) -> Self {
        let message = &entry.message;
        Self {
            id: message.id,
            at: message.created_at.format("%Y-%m-%d %H:%M").to_string(),
            from: if entry.is_mine {
                "you".to_string()
            } else {
                message.sender_name.clone()
            },
            mine: entry.is_mine,
            task: message.task,
            text: message.body().unwrap_or_default().to_string(),
            file: message.file_url.clone(),
        }
    }
}

impl ChatLine {
    /// Single-line form used when following a thread.
    fn print(&self, format: OutputFormat) -> anyhow::Result<()> {
        match format {
            OutputFormat::Table => {
                let attachment = self.file.as_deref().map(|f| format!(" [{f}]")).unwrap_or_default();
                println!("{} {}: {}{attachment}", self.at, self.from, self.text);
            }
            OutputFormat::Json | OutputFormat::Raw => println!("{}", serde_json::to_string(self)?),
        }
        Ok(())
    }
}

/// Handle `pulse chat <subcommand>`.
pub async fn handle(action: &ChatCommands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ChatCommands::Show(args) => {
            let thread = open_thread(args, ctx)?;
            with_spinner("Loading messages", thread.refresh()).await?;
            let lines: Vec<ChatLine> = thread.view().entries.iter().map(ChatLine::from).collect();
            output(&lines, flags.format)
        }
        ChatCommands::Send(args) => send::run(args, ctx, flags).await,
        ChatCommands::Watch(args) => watch::run(args, ctx, flags).await,
    }
}

fn open_thread(args: &ChatThreadArgs, ctx: &AppContext) -> anyhow::Result<Thread> {
    let role = ctx.require_role()?;
    let mut thread = Thread::new(Arc::clone(&ctx.client), Arc::clone(&ctx.chat_cache), role)
        .with_peer(args.peer)
        .with_sender_name(ctx.sender_name());
    if let Some(task) = args.task {
        thread = thread.with_task(task);
    }
    Ok(thread)
}
