use pulse_client::wire::{InviteAcceptance, Registration};

use super::Ack;
use super::login::persist;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::{AcceptInviteArgs, RegisterArgs};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

pub async fn register(args: &RegisterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registration = Registration {
        email: args.email.trim().to_string(),
        password: args.password.clone(),
        full_name: args.full_name.trim().to_string(),
        company: args.company.clone(),
        position: args.position.clone(),
    };
    let detail = with_spinner("Registering", ctx.client.register(&registration)).await?;
    output(&Ack::from(detail), flags.format)
}

pub async fn accept_invite(args: &AcceptInviteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let acceptance = InviteAcceptance {
        token: args.token.clone(),
        password: args.password.clone(),
        full_name: args.full_name.clone(),
        position: args.position.clone(),
    };
    let state = with_spinner("Accepting invitation", ctx.client.accept_invite(&acceptance)).await?;
    let response = persist(ctx, state)?;
    output(&response, flags.format)
}

pub async fn verify_email(token: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let detail = ctx.client.verify_email(token).await?;
    output(&Ack::from(detail), flags.format)
}

pub async fn resend_verification(email: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let detail = ctx.client.resend_verification(email.trim()).await?;
    output(&Ack::from(detail), flags.format)
}
