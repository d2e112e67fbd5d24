//! Task list rendering.
//!
//! Shows a loading placeholder until the first refresh settles, an empty
//! state when there are no tasks, and otherwise one row per task:
//! checkbox, title (or the inline edit field), status pill and, on the
//! selected row, the available actions.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tasklet_proto::Task;

use super::{input_box, theme};
use crate::app::{App, Focus};

/// Shown until the first load completes.
pub const LOADING_TEXT: &str = "Loading tasks\u{2026}";

/// Shown when the collection is empty.
pub const EMPTY_TEXT: &str = "No tasks yet. Add one above.";

/// Render the task list pane.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == Focus::List || app.editing.is_some();

    let title = app
        .tasks
        .tasks()
        .map_or_else(|| "Tasks".to_string(), |t| format!("Tasks ({})", t.len()));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme::border(is_focused));

    let Some(tasks) = app.tasks.tasks() else {
        let placeholder = Paragraph::new(Span::styled(LOADING_TEXT, theme::dimmed())).block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    if tasks.is_empty() {
        let placeholder = Paragraph::new(Span::styled(EMPTY_TEXT, theme::dimmed())).block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let is_selected = idx == app.selected;
            let style = if is_selected && is_focused {
                theme::selected()
            } else if is_selected {
                theme::highlighted()
            } else {
                theme::normal()
            };
            ListItem::new(row(app, task, is_selected && is_focused)).style(style)
        })
        .collect();

    // The list scrolls to keep the selected row in view.
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

/// Builds the line for one task.
fn row(app: &App, task: &Task, show_actions: bool) -> Line<'static> {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let mut spans = vec![Span::raw(checkbox), Span::raw(" ")];

    let editing = app.editing.as_ref().filter(|e| e.id == task.id);
    if let Some(edit) = editing {
        spans.extend(input_box::field_line(&edit.draft, true, theme::normal()).spans);
    } else {
        let title_style = if task.completed {
            theme::dimmed()
        } else {
            theme::normal()
        };
        spans.push(Span::styled(task.title.clone(), title_style));
    }

    let (label, color) = if task.id.is_synthetic() {
        ("Saving", theme::WARNING)
    } else if task.completed {
        ("Done", theme::SUCCESS)
    } else {
        ("Open", theme::FG_SECONDARY)
    };
    spans.push(Span::raw("  "));
    spans.push(Span::styled(format!("({label})"), theme::pill(color)));

    if editing.is_some() {
        spans.push(Span::styled("  [Enter] Save  [Esc] Cancel", theme::dimmed()));
    } else if show_actions && !task.id.is_synthetic() {
        spans.push(Span::styled("  [e] Edit  [d] Delete", theme::dimmed()));
    }

    Line::from(spans)
}
