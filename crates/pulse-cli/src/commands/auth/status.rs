use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    email: Option<String>,
    role: Option<String>,
    full_name: Option<String>,
    token_source: Option<&'static str>,
    api: String,
}

pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = ctx.session.state();
    let status = AuthStatusResponse {
        authenticated: state.is_authenticated(),
        email: ctx.session.email(),
        role: state.role().map(|role| role.to_string()),
        full_name: ctx.profile.as_ref().map(|profile| profile.full_name.clone()),
        token_source: ctx.session.source().map(pulse_auth::SessionSource::as_str),
        api: ctx.client.base_url().to_string(),
    };
    output(&status, flags.format)
}
