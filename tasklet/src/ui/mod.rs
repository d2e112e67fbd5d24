//! Terminal UI rendering.

pub mod banner;
pub mod header;
pub mod input_box;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let banner_height = u16::from(app.tasks.last_error().is_some());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Header
            Constraint::Length(banner_height), // Error banner
            Constraint::Length(3),             // Input
            Constraint::Min(3),                // Tasks
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    header::render(frame, chunks[0], app);
    if let Some(message) = app.tasks.last_error() {
        banner::render(frame, chunks[1], message);
    }
    input_box::render(frame, chunks[2], app);
    task_list::render(frame, chunks[3], app);
    status_bar::render(frame, chunks[4], app);
}
