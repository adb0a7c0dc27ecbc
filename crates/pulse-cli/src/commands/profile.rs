use pulse_client::wire::ProfilePatch;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProfileCommands;
use crate::cli::subcommands::profile::ProfileUpdateArgs;
use crate::commands::shared::upload::read_upload;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;

/// Handle `pulse profile <subcommand>`.
pub async fn handle(action: &ProfileCommands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require(None)?;

    match action {
        ProfileCommands::Get => {
            let profile = match ctx.profile.clone() {
                Some(profile) => profile,
                None => with_spinner("Loading profile", ctx.client.fetch_profile()).await?,
            };
            output(&profile, flags.format)
        }
        ProfileCommands::Update(args) => {
            let patch = patch_from(args)?;
            let profile = with_spinner("Saving profile", ctx.client.update_profile(&patch)).await?;
            ctx.profile = Some(profile.clone());
            output(&profile, flags.format)
        }
    }
}

fn patch_from(args: &ProfileUpdateArgs) -> anyhow::Result<ProfilePatch> {
    let patch = ProfilePatch {
        full_name: args.full_name.clone(),
        company: args.company.clone(),
        position: args.position.clone(),
        avatar: args.avatar.as_deref().map(read_upload).transpose()?,
    };
    if patch.is_empty() {
        anyhow::bail!("nothing to update: pass --full-name, --company, --position, or --avatar");
    }
    Ok(patch)
}
