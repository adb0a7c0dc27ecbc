//! # pulse-sync
//!
//! Client-side state that sits between the REST client and the views:
//! - [`cache`]: keyed query cache with request deduplication, prefix
//!   invalidation, and per-key generations so late responses never win
//! - [`chat`]: polled conversation threads with optimistic sends
//! - [`tasks`]: the task board, which reads through the cache and
//!   invalidates it after mutations

pub mod cache;
pub mod chat;
pub mod error;
pub mod tasks;

pub use cache::{QueryCache, QueryKey, QueryState};
pub use chat::{ChatThread, ConversationSource, PollHandle, ThreadView};
pub use error::{SendError, SyncError};
pub use tasks::{TaskBoard, TaskRow};
