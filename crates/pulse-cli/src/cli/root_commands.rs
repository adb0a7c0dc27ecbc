use clap::Subcommand;

use crate::cli::subcommands::{
    AuthCommands, ChatCommands, ExecutorCommands, ProfileCommands, ReportCommands,
    TaskCommands, TelegramCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Log in, register, and manage passwords.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// The creator's executors.
    Executor {
        #[command(subcommand)]
        action: ExecutorCommands,
    },
    /// Conversations with a peer.
    Chat {
        #[command(subcommand)]
        action: ChatCommands,
    },
    /// Your profile.
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Telegram notifications.
    Telegram {
        #[command(subcommand)]
        action: TelegramCommands,
    },
    /// KPI reports.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
}
