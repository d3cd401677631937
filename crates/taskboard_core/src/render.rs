//! Pure projection of controller state into a presentation model.
//!
//! # Responsibility
//! - Build the full `PresentationModel` from the task collection and the
//!   surface state, without touching any rendering target.
//! - Carry user-supplied text both verbatim and escaped, so text surfaces
//!   and markup surfaces each pick the form they need.
//!
//! # Invariants
//! - `render` is deterministic: equal inputs give equal models.
//! - An empty collection always yields `TaskListView::Empty` and zero counters.
//! - Every `*_html` field is `escape_html` of its verbatim sibling.

use crate::model::task::{Task, TaskId};
use crate::model::theme::ThemePreference;
use crate::quote::QuoteState;

pub const EMPTY_STATE_ICON: &str = "📝";
pub const EMPTY_STATE_HEADING: &str = "No tasks yet";
pub const EMPTY_STATE_HINT: &str = "Start by adding your first task!";

/// Which of the two surface sections is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    AddTask,
    TaskList,
}

/// Unsubmitted add-form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub title: String,
    pub description: String,
}

impl FormDraft {
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}

/// Presentation state that is not part of the task collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    pub theme: ThemePreference,
    pub view: View,
    pub draft: FormDraft,
}

/// Summary counters shown above the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }
}

/// One list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub title_html: String,
    /// `None` when the task has no description.
    pub description: Option<String>,
    pub description_html: Option<String>,
    pub completed: bool,
    /// Creation date as `d/m/yyyy` (UTC).
    pub created_on: String,
}

/// Placeholder shown instead of rows when there are no tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub heading: &'static str,
    pub hint: &'static str,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            icon: EMPTY_STATE_ICON,
            heading: EMPTY_STATE_HEADING,
            hint: EMPTY_STATE_HINT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListView {
    Empty(EmptyState),
    Items(Vec<TaskView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotePanelView {
    Loading,
    Ready {
        content: String,
        author: String,
        content_html: String,
        author_html: String,
        /// Set when the fallback quote is shown.
        offline: bool,
    },
}

/// Everything the binding layer needs to paint the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationModel {
    pub theme: ThemePreference,
    pub theme_toggle_icon: &'static str,
    pub view: View,
    pub form: FormDraft,
    pub task_list: TaskListView,
    pub stats: TaskStats,
    pub quote: QuotePanelView,
}

/// Builds the presentation model for the given state.
pub fn render(tasks: &[Task], surface: &SurfaceState, quote: &QuoteState) -> PresentationModel {
    let task_list = if tasks.is_empty() {
        TaskListView::Empty(EmptyState::default())
    } else {
        TaskListView::Items(tasks.iter().map(task_view).collect())
    };

    PresentationModel {
        theme: surface.theme,
        theme_toggle_icon: surface.theme.toggle_icon(),
        view: surface.view,
        form: surface.draft.clone(),
        task_list,
        stats: TaskStats::from_tasks(tasks),
        quote: quote_panel(quote),
    }
}

/// Escapes `& < > " '` for safe embedding in markup text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn task_view(task: &Task) -> TaskView {
    let description = Some(task.description()).filter(|text| !text.is_empty());
    TaskView {
        id: task.id(),
        title: task.title().to_string(),
        title_html: escape_html(task.title()),
        description: description.map(str::to_string),
        description_html: description.map(escape_html),
        completed: task.is_completed(),
        created_on: task.created_at().format("%-d/%-m/%Y").to_string(),
    }
}

fn quote_panel(quote: &QuoteState) -> QuotePanelView {
    match quote {
        QuoteState::Loading => QuotePanelView::Loading,
        QuoteState::Ready(quote) => QuotePanelView::Ready {
            content: quote.content.clone(),
            author: quote.author.clone(),
            content_html: escape_html(&quote.content),
            author_html: escape_html(&quote.author),
            offline: quote.is_fallback,
        },
    }
}
