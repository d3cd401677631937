//! HTML fragment writer for the task list section.
//!
//! Consumes an already-escaped `PresentationModel`; no escaping happens here.

use crate::render::{PresentationModel, QuotePanelView, TaskListView, TaskView};
use std::fmt::Write;

/// Renders the task list, counters and quote panel as an HTML fragment.
pub fn render_html(model: &PresentationModel) -> String {
    let mut html = String::new();
    let _ = writeln!(html, r#"<div class="{}">"#, model.theme.as_str());

    match &model.task_list {
        TaskListView::Empty(empty) => {
            let _ = writeln!(
                html,
                r#"<div class="empty-state"><div class="empty-state-icon">{}</div><h3>{}</h3><p>{}</p></div>"#,
                empty.icon, empty.heading, empty.hint
            );
        }
        TaskListView::Items(rows) => {
            for row in rows {
                write_row(&mut html, row);
            }
        }
    }

    let _ = writeln!(
        html,
        r#"<div class="stats"><span id="totalTodos">{}</span><span id="completedTodos">{}</span><span id="pendingTodos">{}</span></div>"#,
        model.stats.total, model.stats.completed, model.stats.pending
    );

    if let QuotePanelView::Ready {
        content_html,
        author_html,
        offline,
        ..
    } = &model.quote
    {
        let _ = write!(
            html,
            r#"<div class="quote-text">"{content_html}"</div><div class="quote-author">— {author_html}</div>"#
        );
        if *offline {
            html.push_str(r#"<div class="quote-offline">* Quote offline</div>"#);
        }
        html.push('\n');
    }

    html.push_str("</div>\n");
    html
}

fn write_row(html: &mut String, row: &TaskView) {
    let (item_class, checked) = if row.completed {
        ("todo-item completed", " checked")
    } else {
        ("todo-item", "")
    };
    let _ = write!(
        html,
        r#"<div class="{item_class}" data-id="{}"><input type="checkbox" class="todo-checkbox"{checked}><div class="todo-content"><div class="todo-title">{}</div>"#,
        row.id, row.title_html
    );
    if let Some(description) = &row.description_html {
        let _ = write!(html, r#"<div class="todo-description">{description}</div>"#);
    }
    let _ = writeln!(
        html,
        r#"<div class="todo-date">📅 {}</div></div></div>"#,
        row.created_on
    );
}
