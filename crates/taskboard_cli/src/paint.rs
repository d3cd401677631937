//! Terminal painter for presentation models.

use taskboard_core::{
    Notification, NotificationKind, PresentationModel, QuotePanelView, TaskListView, View,
};

/// Formats the list view, counters and quote panel as terminal text.
pub fn paint(model: &PresentationModel) -> String {
    let mut out = format!(
        "[{} theme {}]  total={} completed={} pending={}\n",
        model.theme.as_str(),
        model.theme_toggle_icon,
        model.stats.total,
        model.stats.completed,
        model.stats.pending
    );

    match &model.task_list {
        TaskListView::Empty(empty) => {
            out.push_str(&format!("  {} {}\n  {}\n", empty.icon, empty.heading, empty.hint));
        }
        TaskListView::Items(rows) => {
            for row in rows {
                let mark = if row.completed { "x" } else { " " };
                out.push_str(&format!(
                    "  [{mark}] {:<15} {}  ({})\n",
                    row.id, row.title, row.created_on
                ));
                if let Some(description) = &row.description {
                    out.push_str(&format!("        {description}\n"));
                }
            }
        }
    }

    out.push_str(&paint_quote(&model.quote));

    if model.view == View::AddTask && !model.form.title.is_empty() {
        out.push_str(&format!("  draft: {}\n", model.form.title));
    }
    out
}

pub fn paint_quote(quote: &QuotePanelView) -> String {
    match quote {
        QuotePanelView::Loading => "  quote: loading...\n".to_string(),
        QuotePanelView::Ready {
            content,
            author,
            offline,
            ..
        } => {
            let mut out = format!("  \"{content}\" — {author}\n");
            if *offline {
                out.push_str("  * Quote offline\n");
            }
            out
        }
    }
}

pub fn paint_notification(notification: &Notification) -> String {
    let icon = match notification.kind {
        NotificationKind::Success => "✅",
        NotificationKind::Info => "🗑️",
    };
    format!("{icon} {}", notification.message)
}
