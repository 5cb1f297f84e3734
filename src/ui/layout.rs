//! Screen regions

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// The fixed vertical split: one-line title, the grid, one-line status.
pub struct AppLayout {
    pub title: Rect,
    pub content: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            title: chunks[0],
            content: chunks[1],
            status: chunks[2],
        }
    }
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
