mod login;
mod logout;
mod password;
mod register;
mod status;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;

/// Backend acknowledgement for commands that return only a message.
#[derive(Serialize)]
pub(crate) struct Ack {
    pub ok: bool,
    pub detail: Option<String>,
}

impl From<pulse_client::wire::Detail> for Ack {
    fn from(detail: pulse_client::wire::Detail) -> Self {
        Self {
            ok: true,
            detail: detail.detail,
        }
    }
}

/// Handle `pulse auth <subcommand>`.
pub async fn handle(action: &AuthCommands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, ctx, flags).await,
        AuthCommands::Logout => logout::handle(ctx, flags),
        AuthCommands::Status => status::handle(ctx, flags),
        AuthCommands::Register(args) => register::register(args, ctx, flags).await,
        AuthCommands::AcceptInvite(args) => register::accept_invite(args, ctx, flags).await,
        AuthCommands::VerifyEmail { token } => register::verify_email(token, ctx, flags).await,
        AuthCommands::ResendVerification { email } => {
            register::resend_verification(email, ctx, flags).await
        }
        AuthCommands::ChangePassword(args) => password::change(args, ctx, flags).await,
        AuthCommands::RequestPasswordReset { email } => {
            password::request_reset(email, ctx, flags).await
        }
        AuthCommands::ResetPassword(args) => password::reset(args, ctx, flags).await,
    }
}
