//! Core logic for Taskboard, a local task list.
//! This crate owns the task invariants, persistence and presentation model;
//! binding layers only forward user input and paint `PresentationModel`s.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod markup;
pub mod model;
pub mod quote;
pub mod render;
pub mod service;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use markup::render_html;
pub use model::task::{Task, TaskId, TaskIdAllocator, TaskValidationError};
pub use model::theme::ThemePreference;
pub use quote::{HttpQuoteProvider, Quote, QuoteProvider, QuoteState, StaticQuoteProvider};
pub use render::{
    escape_html, render, EmptyState, FormDraft, PresentationModel, QuotePanelView, SurfaceState,
    TaskListView, TaskStats, TaskView, View,
};
pub use service::task_list::{
    ConfirmGate, Notification, NotificationKind, TaskListController,
};
pub use store::{
    MemoryStorage, PersistentStore, SqliteStorage, StorageBackend, StorageScope, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
