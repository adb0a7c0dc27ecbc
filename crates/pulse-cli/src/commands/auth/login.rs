use pulse_client::wire::Credentials;
use pulse_core::entities::AuthState;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

#[derive(Serialize)]
pub(crate) struct AuthLoginResponse {
    authenticated: bool,
    email: Option<String>,
    role: Option<String>,
    stored_in: Option<&'static str>,
}

pub async fn handle(args: &AuthLoginArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let credentials = Credentials {
        email: args.email.trim().to_string(),
        password: args.password.clone(),
    };
    let state = with_spinner("Logging in", ctx.client.login(&credentials)).await?;
    let response = persist(ctx, state)?;
    output(&response, flags.format)
}

/// Store a fresh session and describe it.
pub(crate) fn persist(ctx: &AppContext, state: AuthState) -> anyhow::Result<AuthLoginResponse> {
    ctx.session.set(state)?;
    let state = ctx.session.state();
    Ok(AuthLoginResponse {
        authenticated: state.is_authenticated(),
        email: state.user.as_ref().map(|user| user.email.clone()),
        role: state.role().map(|role| role.to_string()),
        stored_in: ctx.session.source().map(pulse_auth::SessionSource::as_str),
    })
}
