//! # pulse-core
//!
//! Core types and pure client-side logic for Pulse.
//!
//! This crate provides the foundational types shared across all Pulse crates:
//! - Entity structs mirroring the TaskPulse REST payloads (tasks, executors,
//!   profiles, chat messages, Telegram profiles, KPI reports)
//! - Status, priority, role, and sort enums
//! - The task list projection (search + sort over fetched tasks)
//! - Chat thread ordering and ownership attribution
//! - Route/view guard decisions
//! - Russian-locale string collation used by the projection
//! - Cross-cutting error types

pub mod chat;
pub mod collation;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod guard;
pub mod projection;

pub use errors::CoreError;
