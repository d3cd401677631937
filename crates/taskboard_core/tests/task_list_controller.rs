use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::sync::Arc;
use taskboard_core::service::task_list::{
    LAST_VISITED_KEY, TASK_DELETED_MESSAGE, THEME_KEY, TODOS_KEY,
};
use taskboard_core::{
    Clock, MemoryStorage, NotificationKind, PersistentStore, Quote, QuotePanelView, QuoteState,
    StaticQuoteProvider, StorageScope, Task, TaskListController, TaskListView, TaskStats,
    ThemePreference, View,
};

/// Clock frozen at one instant unless advanced explicitly.
struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    fn at(instant: DateTime<Utc>) -> Self {
        Self {
            now_ms: Cell::new(instant.timestamp_millis()),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms.get()).unwrap()
    }
}

fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap()
}

fn controller() -> TaskListController {
    TaskListController::load_with_clock(
        PersistentStore::in_memory(),
        Box::new(ManualClock::at(fixed_instant())),
    )
}

fn persisted_tasks(controller: TaskListController) -> (Vec<Task>, Vec<Task>) {
    let in_memory = controller.tasks().to_vec();
    let store = controller.into_store();
    let reloaded = TaskListController::load(store).tasks().to_vec();
    (in_memory, reloaded)
}

fn accept(_: &str) -> bool {
    true
}

fn decline(_: &str) -> bool {
    false
}

#[test]
fn load_from_empty_storage_starts_empty_with_light_theme() {
    let controller = controller();

    assert!(controller.tasks().is_empty());
    assert_eq!(controller.theme(), ThemePreference::Light);
    assert_eq!(controller.view(), View::AddTask);
    assert_eq!(controller.quote_state(), QuoteState::Loading);
}

#[test]
fn load_stamps_last_visited_in_session_scope() {
    let controller = controller();
    let store = controller.into_store();

    assert_eq!(
        store
            .get::<String>(LAST_VISITED_KEY, StorageScope::Session)
            .as_deref(),
        Some("2026-02-13T10:00:00.000Z")
    );
    assert_eq!(store.get::<String>(LAST_VISITED_KEY, StorageScope::Durable), None);
}

#[test]
fn load_restores_saved_theme() {
    let mut store = PersistentStore::in_memory();
    store.set(THEME_KEY, &ThemePreference::Dark, StorageScope::Session);

    let controller = TaskListController::load(store);
    assert_eq!(controller.theme(), ThemePreference::Dark);
    assert_eq!(controller.render().theme_toggle_icon, "☀️");
}

#[test]
fn load_treats_corrupted_todos_as_empty() {
    let mut store = PersistentStore::in_memory();
    store.set(TODOS_KEY, "definitely not a task list", StorageScope::Durable);

    let controller = TaskListController::load(store);
    assert!(controller.tasks().is_empty());
}

#[test]
fn load_drops_stored_tasks_with_blank_titles() {
    let mut store = PersistentStore::in_memory();
    let raw = serde_json::json!([
        {"id": 1, "title": "kept", "description": "", "completed": false, "createdAt": "2026-01-01T00:00:00.000Z"},
        {"id": 2, "title": "  ", "description": "", "completed": false, "createdAt": "2026-01-01T00:00:00.000Z"}
    ]);
    store.set(TODOS_KEY, &raw, StorageScope::Durable);

    let controller = TaskListController::load(store);
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.tasks()[0].title(), "kept");
}

#[test]
fn add_task_appends_one_pending_task() {
    let mut controller = controller();
    controller.add_task("first", "");

    let before = controller.tasks().len();
    let id = controller.add_task("second", "details").unwrap();

    assert_eq!(controller.tasks().len(), before + 1);
    let last = controller.tasks().last().unwrap();
    assert_eq!(last.id(), id);
    assert_eq!(last.title(), "second");
    assert!(!last.is_completed());
    assert_eq!(last.created_at(), fixed_instant());
}

#[test]
fn add_task_rejects_blank_titles() {
    let mut controller = controller();

    assert_eq!(controller.add_task("", "desc"), None);
    assert_eq!(controller.add_task("   ", "desc"), None);
    assert!(controller.tasks().is_empty());
    assert!(controller.take_notifications().is_empty());
}

#[test]
fn tasks_added_in_the_same_millisecond_get_distinct_ids() {
    let mut controller = controller();

    let first = controller.add_task("a", "").unwrap();
    let second = controller.add_task("b", "").unwrap();
    let third = controller.add_task("c", "").unwrap();

    assert_eq!(first, fixed_instant().timestamp_millis());
    assert!(first < second && second < third);
}

#[test]
fn submit_form_adds_task_and_clears_draft() {
    let mut controller = controller();
    controller.set_draft(" Water plants ", " balcony ");

    let id = controller.submit_form().unwrap();

    assert_eq!(controller.task(id).unwrap().title(), "Water plants");
    assert_eq!(controller.task(id).unwrap().description(), "balcony");
    assert!(controller.draft().title.is_empty());
    assert!(controller.draft().description.is_empty());
    assert_eq!(controller.render().view, View::TaskList);
}

#[test]
fn toggle_task_twice_restores_original_state() {
    let mut controller = controller();
    let id = controller.add_task("flip me", "").unwrap();

    assert!(controller.toggle_task(id));
    assert!(controller.task(id).unwrap().is_completed());
    assert!(controller.toggle_task(id));
    assert!(!controller.task(id).unwrap().is_completed());
}

#[test]
fn toggle_unknown_id_is_a_no_op() {
    let mut controller = controller();
    controller.add_task("only", "");
    let before = controller.tasks().to_vec();

    assert!(!controller.toggle_task(424242));
    assert_eq!(controller.tasks(), before.as_slice());
}

#[test]
fn delete_requires_confirmation() {
    let mut controller = controller();
    let id = controller.add_task("keep unless confirmed", "").unwrap();
    controller.take_notifications();

    assert!(!controller.delete_task(id, &mut decline));
    assert_eq!(controller.tasks().len(), 1);
    assert!(controller.take_notifications().is_empty());

    assert!(controller.delete_task(id, &mut accept));
    assert!(controller.tasks().is_empty());
    let notifications = controller.take_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Info);
    assert_eq!(notifications[0].message, TASK_DELETED_MESSAGE);
}

#[test]
fn delete_unknown_id_does_not_prompt() {
    let mut controller = controller();
    let mut prompts = 0;
    let mut gate = |_: &str| {
        prompts += 1;
        true
    };

    assert!(!controller.delete_task(7, &mut gate));
    assert_eq!(prompts, 0);
}

#[test]
fn every_mutation_is_persisted_and_reloads_equal() {
    let mut controller = controller();
    let a = controller.add_task("a", "first").unwrap();
    let b = controller.add_task("b", "").unwrap();
    controller.add_task("c", "third").unwrap();
    controller.toggle_task(a);
    controller.delete_task(b, &mut accept);

    let (in_memory, reloaded) = persisted_tasks(controller);
    assert_eq!(reloaded, in_memory);
    assert_eq!(
        reloaded.iter().map(Task::title).collect::<Vec<_>>(),
        vec!["a", "c"]
    );
}

#[test]
fn failed_write_keeps_in_memory_state() {
    let store = PersistentStore::new(
        Box::new(MemoryStorage::with_quota(16)),
        Box::new(MemoryStorage::default()),
    );
    let mut controller = TaskListController::load(store);

    let id = controller.add_task("too large to persist", "").unwrap();
    assert_eq!(controller.task(id).unwrap().title(), "too large to persist");

    let reloaded = TaskListController::load(controller.into_store());
    assert!(reloaded.tasks().is_empty());
}

#[test]
fn empty_render_shows_placeholder_and_zero_counters() {
    let controller = controller();
    let model = controller.render();

    assert!(matches!(model.task_list, TaskListView::Empty(_)));
    assert_eq!(model.stats, TaskStats::default());
}

#[test]
fn buy_milk_scenario() {
    let mut controller = controller();

    let id = controller.add_task("Buy milk", "2%").unwrap();
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.tasks()[0].title(), "Buy milk");
    assert_eq!(controller.tasks()[0].description(), "2%");
    assert!(!controller.tasks()[0].is_completed());
    assert_eq!(
        controller.render().stats,
        TaskStats {
            total: 1,
            completed: 0,
            pending: 1
        }
    );

    controller.toggle_task(id);
    assert!(controller.tasks()[0].is_completed());
    assert_eq!(
        controller.render().stats,
        TaskStats {
            total: 1,
            completed: 1,
            pending: 0
        }
    );

    assert!(controller.delete_task(id, &mut accept));
    assert!(controller.tasks().is_empty());
    let model = controller.render();
    assert_eq!(model.stats, TaskStats::default());
    assert!(matches!(model.task_list, TaskListView::Empty(_)));
}

#[test]
fn markup_titles_are_stored_verbatim_and_rendered_escaped() {
    let mut controller = controller();
    let title = "<img src=x onerror=alert(1)>";
    controller.add_task(title, "it's \"fine\"");

    assert_eq!(controller.tasks()[0].title(), title);

    let TaskListView::Items(rows) = controller.render().task_list else {
        panic!("expected one row");
    };
    assert_eq!(rows[0].title_html, "&lt;img src=x onerror=alert(1)&gt;");
    assert_eq!(
        rows[0].description_html.as_deref(),
        Some("it&#039;s &quot;fine&quot;")
    );

    let (_, reloaded) = persisted_tasks(controller);
    assert_eq!(reloaded[0].title(), title);
}

#[test]
fn toggle_theme_persists_to_session_scope_only() {
    let mut controller = controller();

    assert_eq!(controller.toggle_theme(), ThemePreference::Dark);
    assert!(controller.tasks().is_empty());

    let store = controller.into_store();
    assert_eq!(
        store.get::<ThemePreference>(THEME_KEY, StorageScope::Session),
        Some(ThemePreference::Dark)
    );
    assert_eq!(store.get::<ThemePreference>(THEME_KEY, StorageScope::Durable), None);
}

#[test]
fn view_switching_does_not_touch_tasks() {
    let mut controller = controller();
    controller.add_task("x", "");

    controller.show_add_form();
    assert_eq!(controller.render().view, View::AddTask);
    controller.show_task_list();
    assert_eq!(controller.render().view, View::TaskList);
    assert_eq!(controller.tasks().len(), 1);
}

#[tokio::test]
async fn quote_request_updates_only_the_quote_panel() {
    let mut controller = controller();
    controller.add_task("unchanged", "");
    let before = controller.tasks().to_vec();

    let provider = Arc::new(StaticQuoteProvider::new(Quote::new(
        "Stay hungry & foolish",
        "Someone",
    )));
    assert!(controller.request_quote(provider).await);

    assert_eq!(controller.tasks(), before.as_slice());
    assert_eq!(
        controller.render().quote,
        QuotePanelView::Ready {
            content: "Stay hungry & foolish".to_string(),
            author: "Someone".to_string(),
            content_html: "Stay hungry &amp; foolish".to_string(),
            author_html: "Someone".to_string(),
            offline: false,
        }
    );
}

#[tokio::test]
async fn offline_quote_is_flagged_in_the_panel() {
    let controller = controller();
    controller
        .request_quote(Arc::new(StaticQuoteProvider::offline()))
        .await;

    let QuotePanelView::Ready { offline, .. } = controller.render().quote else {
        panic!("quote should be ready");
    };
    assert!(offline);
}

#[tokio::test]
async fn quote_completing_after_teardown_is_ignored() {
    let controller = controller();
    let pending = controller.request_quote(Arc::new(StaticQuoteProvider::offline()));
    drop(controller);

    assert!(!pending.await);
}

#[test]
fn rejected_adds_do_not_shift_the_next_id() {
    let mut controller = controller();
    for _ in 0..1000 {
        assert_eq!(controller.add_task("  ", ""), None);
    }

    let id = controller.add_task("real", "").unwrap();
    let task = controller.task(id).unwrap();

    assert_eq!(id, fixed_instant().timestamp_millis());
    assert_eq!(id, task.created_at().timestamp_millis());
}
