//! Task list controller.
//!
//! # Responsibility
//! - Own the in-memory task collection for one session.
//! - Mirror the full collection to the durable scope after every mutation.
//! - Keep theme, view and form state, and expose a pure `render`.
//! - Hand out the quote request as a detached future.
//!
//! # Invariants
//! - Collection order is insertion order.
//! - Every successful mutation is persisted before it is observable through
//!   `render`.
//! - Only the quote request touches the quote panel, and only while the
//!   controller is alive.

use crate::clock::{Clock, SystemClock};
use crate::model::task::{Task, TaskId, TaskIdAllocator};
use crate::model::theme::ThemePreference;
use crate::quote::{Quote, QuoteProvider, QuoteState};
use crate::render::{render, FormDraft, PresentationModel, SurfaceState, View};
use crate::store::{PersistentStore, StorageScope};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::{Arc, Mutex, Weak};

/// Durable key holding the JSON task array.
pub const TODOS_KEY: &str = "todos";
/// Session key holding the theme preference.
pub const THEME_KEY: &str = "theme";
/// Session key stamped with the load time on every startup.
pub const LAST_VISITED_KEY: &str = "lastVisited";

pub const TASK_ADDED_MESSAGE: &str = "Task added successfully!";
pub const TASK_DELETED_MESSAGE: &str = "Task deleted successfully!";
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this task?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
}

/// Transient message for the binding layer to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// User confirmation for destructive actions.
pub trait ConfirmGate {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmGate for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

type QuotePanel = Arc<Mutex<QuoteState>>;

pub struct TaskListController {
    store: PersistentStore,
    clock: Box<dyn Clock>,
    tasks: Vec<Task>,
    ids: TaskIdAllocator,
    surface: SurfaceState,
    quote: QuotePanel,
    notifications: Vec<Notification>,
}

impl TaskListController {
    /// Loads session state from `store` using the system clock.
    pub fn load(store: PersistentStore) -> Self {
        Self::load_with_clock(store, Box::new(SystemClock))
    }

    /// Loads tasks and theme, and stamps `lastVisited`.
    ///
    /// Missing or unreadable data falls back to an empty collection and the
    /// light theme. Loaded tasks with a blank title are dropped.
    pub fn load_with_clock(mut store: PersistentStore, clock: Box<dyn Clock>) -> Self {
        let loaded: Vec<Task> = store
            .get(TODOS_KEY, StorageScope::Durable)
            .unwrap_or_default();
        let loaded_count = loaded.len();
        let tasks: Vec<Task> = loaded
            .into_iter()
            .filter(|task| task.validate().is_ok())
            .collect();
        if tasks.len() != loaded_count {
            warn!(
                "event=tasks_load module=controller status=partial dropped={}",
                loaded_count - tasks.len()
            );
        }

        let theme = store
            .get::<ThemePreference>(THEME_KEY, StorageScope::Session)
            .unwrap_or_default();

        let visited_at = clock.now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        store.set(LAST_VISITED_KEY, &visited_at, StorageScope::Session);

        info!(
            "event=controller_load module=controller status=ok tasks={} theme={}",
            tasks.len(),
            theme.as_str()
        );

        Self {
            store,
            clock,
            ids: TaskIdAllocator::seeded_from(&tasks),
            tasks,
            surface: SurfaceState {
                theme,
                ..SurfaceState::default()
            },
            quote: Arc::new(Mutex::new(QuoteState::Loading)),
            notifications: Vec::new(),
        }
    }

    /// Returns the quote request for the caller to drive.
    ///
    /// The future resolves with the provider's quote (remote or fallback) and
    /// writes it to the quote panel, yielding `true`. It yields `false` and
    /// writes nothing if the controller has been dropped in the meantime.
    pub fn request_quote(
        &self,
        provider: Arc<dyn QuoteProvider>,
    ) -> impl Future<Output = bool> + Send + 'static {
        let panel = Arc::downgrade(&self.quote);
        async move {
            let quote = provider.fetch_quote().await;
            apply_quote(&panel, quote)
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn theme(&self) -> ThemePreference {
        self.surface.theme
    }

    pub fn view(&self) -> View {
        self.surface.view
    }

    pub fn draft(&self) -> &FormDraft {
        &self.surface.draft
    }

    pub fn quote_state(&self) -> QuoteState {
        match self.quote.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the add-form input.
    pub fn set_draft(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.surface.draft = FormDraft {
            title: title.into(),
            description: description.into(),
        };
    }

    /// Submits the add form; see `add_task`.
    pub fn submit_form(&mut self) -> Option<TaskId> {
        let FormDraft { title, description } = self.surface.draft.clone();
        self.add_task(&title, &description)
    }

    /// Appends a new pending task.
    ///
    /// Returns `None` without any state change when `title` is blank.
    /// On success the form is cleared and the list view is shown.
    pub fn add_task(&mut self, title: &str, description: &str) -> Option<TaskId> {
        if let Err(err) = Task::validate_title(title) {
            debug!("event=task_add module=controller status=rejected reason={err}");
            return None;
        }

        let created_at = self.clock.now();
        let id = self.ids.next(created_at.timestamp_millis());
        let task = match Task::new(id, title, description, created_at) {
            Ok(task) => task,
            Err(err) => {
                debug!("event=task_add module=controller status=rejected reason={err}");
                return None;
            }
        };

        self.tasks.push(task);
        let persisted = self.persist_tasks();
        info!(
            "event=task_add module=controller status=ok task_id={id} persisted={persisted} total={}",
            self.tasks.len()
        );

        self.surface.draft.clear();
        self.notify(NotificationKind::Success, TASK_ADDED_MESSAGE);
        self.show_task_list();
        Some(id)
    }

    /// Flips completion of task `id`.
    ///
    /// Returns `false` when no such task exists.
    pub fn toggle_task(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id() == id) else {
            debug!("event=task_toggle module=controller status=not_found task_id={id}");
            return false;
        };

        let completed = task.toggle();
        let persisted = self.persist_tasks();
        info!(
            "event=task_toggle module=controller status=ok task_id={id} completed={completed} persisted={persisted}"
        );
        true
    }

    /// Removes task `id` once `gate` confirms.
    ///
    /// Returns `false` when the task does not exist or the user declines.
    pub fn delete_task(&mut self, id: TaskId, gate: &mut dyn ConfirmGate) -> bool {
        let Some(index) = self.tasks.iter().position(|task| task.id() == id) else {
            debug!("event=task_delete module=controller status=not_found task_id={id}");
            return false;
        };

        if !gate.confirm(DELETE_CONFIRM_PROMPT) {
            debug!("event=task_delete module=controller status=cancelled task_id={id}");
            return false;
        }

        self.tasks.remove(index);
        let persisted = self.persist_tasks();
        info!(
            "event=task_delete module=controller status=ok task_id={id} persisted={persisted} total={}",
            self.tasks.len()
        );
        self.notify(NotificationKind::Info, TASK_DELETED_MESSAGE);
        true
    }

    /// Switches between light and dark and saves the choice for the session.
    pub fn toggle_theme(&mut self) -> ThemePreference {
        let theme = self.surface.theme.toggled();
        self.surface.theme = theme;
        let persisted = self.store.set(THEME_KEY, &theme, StorageScope::Session);
        info!(
            "event=theme_toggle module=controller status=ok theme={} persisted={persisted}",
            theme.as_str()
        );
        theme
    }

    pub fn show_add_form(&mut self) {
        self.surface.view = View::AddTask;
    }

    pub fn show_task_list(&mut self) {
        self.surface.view = View::TaskList;
    }

    /// Projects current state; calling it repeatedly has no side effects.
    pub fn render(&self) -> PresentationModel {
        render(&self.tasks, &self.surface, &self.quote_state())
    }

    /// Drains queued notifications in emission order.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Tears the controller down and returns its store.
    pub fn into_store(self) -> PersistentStore {
        self.store
    }

    fn persist_tasks(&mut self) -> bool {
        self.store.set(TODOS_KEY, &self.tasks, StorageScope::Durable)
    }

    fn notify(&mut self, kind: NotificationKind, message: &str) {
        self.notifications.push(Notification::new(kind, message));
    }
}

fn apply_quote(panel: &Weak<Mutex<QuoteState>>, quote: Quote) -> bool {
    let Some(panel) = panel.upgrade() else {
        debug!("event=quote_apply module=controller status=skipped reason=controller_dropped");
        return false;
    };

    let offline = quote.is_fallback;
    match panel.lock() {
        Ok(mut state) => *state = QuoteState::Ready(quote),
        Err(poisoned) => *poisoned.into_inner() = QuoteState::Ready(quote),
    }
    info!("event=quote_apply module=controller status=ok offline={offline}");
    true
}
