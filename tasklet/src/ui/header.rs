//! Header bar: app title and the remote endpoint.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::App;

/// Render the header line at the top of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(app.header_title.as_str(), theme::bold()),
        Span::raw(" | "),
        Span::styled(format!("API: {}", app.endpoint), theme::dimmed()),
    ]);

    frame.render_widget(Paragraph::new(line).style(theme::status_bar_bg()), area);
}
