//! Error banner shown above the input while a failure message is set.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;

/// Render `message` across the full width of `area`.
pub fn render(frame: &mut Frame, area: Rect, message: &str) {
    let line = Line::from(vec![Span::raw(" ! "), Span::raw(message)]);
    frame.render_widget(Paragraph::new(line).style(theme::error_banner()), area);
}
