//! New task input box.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, Focus, TextField};

/// Render the input box.
///
/// The title switches to "Adding…" while a new task awaits its server id.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == Focus::Input && app.editing.is_none();

    let line = if app.input.is_empty() && !is_focused {
        Line::from(Span::styled("What needs doing?", theme::dimmed()))
    } else {
        field_line(&app.input, is_focused, theme::normal())
    };

    let title = if app.tasks.has_unconfirmed() {
        "Adding\u{2026}"
    } else {
        "New task"
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme::border(is_focused));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Spans for a text field, with a block cursor when focused.
pub(super) fn field_line(field: &TextField, focused: bool, style: Style) -> Line<'static> {
    if !focused {
        return Line::from(Span::styled(field.text().to_string(), style));
    }

    let before: String = field.text().chars().take(field.cursor()).collect();
    let after: String = field.text().chars().skip(field.cursor()).collect();
    Line::from(vec![
        Span::styled(before, style),
        Span::styled("\u{2588}", theme::input_cursor()),
        Span::styled(after, style),
    ])
}
