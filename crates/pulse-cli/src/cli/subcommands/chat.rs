use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Chat commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ChatCommands {
    /// Print the conversation with a peer.
    Show(ChatThreadArgs),
    /// Send a message to a peer.
    Send(ChatSendArgs),
    /// Follow a conversation, printing new messages as they arrive.
    Watch(ChatWatchArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ChatThreadArgs {
    /// Peer user id.
    pub peer: i64,
    /// Only messages about this task.
    #[arg(long)]
    pub task: Option<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct ChatSendArgs {
    /// Peer user id.
    pub peer: i64,
    /// Message text; optional when a file is attached.
    pub text: Option<String>,
    #[arg(long)]
    pub task: Option<i64>,
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ChatWatchArgs {
    #[command(flatten)]
    pub thread: ChatThreadArgs,
    /// Polling interval in milliseconds (defaults to chat.poll_interval_ms).
    #[arg(long)]
    pub interval_ms: Option<u64>,
}
