//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage, quote retrieval and rendering into user actions.
//! - Keep binding layers (CLI, UI) decoupled from storage details.

pub mod task_list;
