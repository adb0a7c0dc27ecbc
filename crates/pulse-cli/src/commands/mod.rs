pub mod auth;
pub mod chat;
pub mod dispatch;
pub mod executor;
pub mod profile;
pub mod report;
pub mod shared;
pub mod task;
pub mod telegram;
