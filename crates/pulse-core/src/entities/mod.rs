//! Entity structs mirroring the TaskPulse REST payloads.
//!
//! Fields the backend omits in some builds are optional with `#[serde(default)]`
//! so both client generations' responses deserialize. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod chat;
mod report;
mod session;
mod task;
mod telegram;
mod upload;
mod user;

pub use chat::ChatMessage;
pub use report::{MonthlyKpi, PriorityKpi, ReportSubject, parse_month};
pub use session::{AuthState, AuthUser};
pub use task::{Task, TaskAttachment, parse_due_millis};
pub use telegram::{TelegramLink, TelegramProfile};
pub use upload::Upload;
pub use user::{Executor, UserProfile};

/// Server-assigned task identifier.
pub type TaskId = i64;

/// Server-assigned user identifier.
pub type UserId = i64;

/// Chat message identifier. Negative values are client-side pending messages.
pub type MessageId = i64;
