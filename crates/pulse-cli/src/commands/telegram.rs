use pulse_core::guard::{GuardDecision, telegram_gate};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TelegramCommands;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

#[derive(Serialize)]
struct TelegramStatus {
    linked: bool,
    telegram_user_id: Option<i64>,
    last_activity_at: Option<String>,
    next_step: Option<&'static str>,
}

#[derive(Serialize)]
struct TelegramLinkResponse {
    link: String,
}

/// Handle `pulse telegram <subcommand>`.
pub async fn handle(action: &TelegramCommands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = ctx.require(None)?;

    match action {
        TelegramCommands::Status => {
            let profile = with_spinner("Checking Telegram", ctx.client.telegram_profile()).await?;
            let next_step = match telegram_gate(&state, profile.is_some()) {
                GuardDecision::Render => None,
                GuardDecision::RedirectToFallback => Some("run `pulse telegram link` and open the link"),
                GuardDecision::RedirectToLogin => Some("run `pulse auth login`"),
            };
            output(
                &TelegramStatus {
                    linked: profile.is_some(),
                    telegram_user_id: profile.as_ref().map(|p| p.telegram_user_id),
                    last_activity_at: profile
                        .as_ref()
                        .and_then(|p| p.last_activity_at)
                        .map(|at| at.to_rfc3339()),
                    next_step,
                },
                flags.format,
            )
        }
        TelegramCommands::Link => {
            let link = with_spinner("Requesting link", ctx.client.telegram_link_start()).await?;
            output(&TelegramLinkResponse { link: link.link }, flags.format)
        }
    }
}
