//! Panel layout management
//!
//! Browser on the left; tab bar, editor and results stacked on the right;
//! one-line command bar along the bottom.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub browser: Rect,
    pub tab_bar: Rect,
    pub editor: Rect,
    pub results: Rect,
    pub command_bar: Rect,
}

/// Calculate panel layout for the main screen.
///
/// `browser_width` is clamped so the right column keeps at least 20 cells.
pub fn calculate_layout(area: Rect, browser_width: u16) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let browser_width = browser_width.min(rows[0].width.saturating_sub(20));
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(browser_width), Constraint::Min(20)])
        .split(rows[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(45),
            Constraint::Min(3),
        ])
        .split(columns[1]);

    AppLayout {
        browser: columns[0],
        tab_bar: right[0],
        editor: right[1],
        results: right[2],
        command_bar: rows[1],
    }
}

/// Centered rectangle taking `percent_x`/`percent_y` of `area` (for overlays)
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
