//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the persisted `Task` record and its id allocation.
//! - Define the session-scoped `ThemePreference`.
//!
//! # Invariants
//! - `Task` values are only created through `Task::new`, which validates input.

pub mod task;
pub mod theme;
