use clap::Subcommand;

/// Telegram integration commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TelegramCommands {
    /// Show whether Telegram is linked.
    Status,
    /// Get a deep link that connects the bot to your account.
    Link,
}
