use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Profile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show your profile.
    Get,
    /// Change profile fields.
    Update(ProfileUpdateArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    /// Image file to upload as avatar.
    #[arg(long)]
    pub avatar: Option<PathBuf>,
}
