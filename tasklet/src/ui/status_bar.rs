//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Focus};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = if app.editing.is_some() {
        "Enter: save | Esc: cancel | \u{2190}\u{2192}: move cursor"
    } else {
        match app.focus {
            Focus::Input => "Enter: add | Tab: switch pane | Esc: quit",
            Focus::List => {
                "\u{2191}\u{2193}/jk: move | Space: toggle | e: edit | d: delete | r: refresh | q: quit"
            }
        }
    };

    let counts = app.tasks.tasks().map_or_else(
        || "loading".to_string(),
        |tasks| {
            let done = tasks.iter().filter(|t| t.completed).count();
            format!("{done}/{} done", tasks.len())
        },
    );

    let status_line = Line::from(vec![
        Span::styled(concat!("Tasklet v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
        Span::raw(counts),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
