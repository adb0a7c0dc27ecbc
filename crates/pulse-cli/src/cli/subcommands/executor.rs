use clap::Subcommand;

/// Executor roster commands (creators).
#[derive(Clone, Debug, Subcommand)]
pub enum ExecutorCommands {
    /// List your executors.
    List,
    /// Invite an executor by email.
    Invite { email: String },
}
