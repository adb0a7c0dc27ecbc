use pulse_client::wire::{PasswordChange, PasswordResetConfirm};

use super::Ack;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::{ChangePasswordArgs, ResetPasswordArgs};
use crate::context::AppContext;
use crate::output::output;

pub async fn change(args: &ChangePasswordArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(None)?;
    let change = PasswordChange {
        old_password: args.old.clone(),
        new_password: args.new.clone(),
    };
    let detail = ctx.client.change_password(&change).await?;
    output(&Ack::from(detail), flags.format)
}

pub async fn request_reset(email: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let detail = ctx.client.request_password_reset(email.trim()).await?;
    output(&Ack::from(detail), flags.format)
}

pub async fn reset(args: &ResetPasswordArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let reset = PasswordResetConfirm {
        reset_token: args.token.clone(),
        new_password: args.password.clone(),
        new_password_confirm: args.confirm.clone(),
    };
    let detail = ctx.client.confirm_password_reset(&reset).await?;
    output(&Ack::from(detail), flags.format)
}
