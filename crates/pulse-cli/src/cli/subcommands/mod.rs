pub mod auth;
pub mod chat;
pub mod executor;
pub mod profile;
pub mod report;
pub mod task;
pub mod telegram;

pub use auth::AuthCommands;
pub use chat::ChatCommands;
pub use executor::ExecutorCommands;
pub use profile::ProfileCommands;
pub use report::ReportCommands;
pub use task::TaskCommands;
pub use telegram::TelegramCommands;
