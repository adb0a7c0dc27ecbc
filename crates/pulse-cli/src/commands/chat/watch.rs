use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::{ChatLine, open_thread};
use crate::cli::GlobalFlags;
use crate::cli::subcommands::chat::ChatWatchArgs;
use crate::context::AppContext;

/// How often the printed view is compared with the cache.
const RENDER_EVERY: Duration = Duration::from_millis(250);

pub async fn run(args: &ChatWatchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let interval = args
        .interval_ms
        .map_or_else(|| ctx.config.chat.poll_interval(), Duration::from_millis);
    if interval.is_zero() {
        anyhow::bail!("--interval-ms must be greater than zero");
    }

    let thread = Arc::new(open_thread(&args.thread, ctx)?);
    thread.refresh().await?;

    let mut seen = HashSet::new();
    let mut last_error: Option<String> = None;
    print_new(&thread, &mut seen, &mut last_error, flags)?;

    let poller = thread.spawn_polling(interval);
    let mut render = tokio::time::interval(RENDER_EVERY);
    render.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = render.tick() => print_new(&thread, &mut seen, &mut last_error, flags)?,
        }
    }

    poller.stop();
    Ok(())
}

fn print_new(
    thread: &super::Thread,
    seen: &mut HashSet<i64>,
    last_error: &mut Option<String>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let view = thread.view();
    for entry in view.entries.iter().filter(|entry| !entry.is_pending()) {
        if seen.insert(entry.message.id) {
            ChatLine::from(entry).print(flags.format)?;
        }
    }
    if view.error != *last_error {
        if let Some(error) = &view.error {
            tracing::warn!(%error, "chat refresh failed; showing last known messages");
        }
        last_error.clone_from(&view.error);
    }
    Ok(())
}
