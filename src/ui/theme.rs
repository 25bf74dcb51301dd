//! UI theme and styling
//!
//! Defines colors, styles, and visual appearance for all UI components.

use ratatui::style::{Color, Modifier, Style};

/// Application theme
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_focused: Style,
    pub border_unfocused: Style,

    // Database browser
    pub tree_database: Style,
    pub tree_table: Style,
    pub tree_selected: Style,
    pub tree_placeholder: Style,

    // Tab bar
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub tab_overflow: Style,

    // Query editor
    pub editor_text: Style,
    pub editor_keyword: Style,
    pub editor_string: Style,
    pub editor_identifier: Style,
    pub editor_number: Style,
    pub editor_comment: Style,
    pub editor_line_number: Style,
    pub editor_line_number_active: Style,

    // Results grid
    pub results_header: Style,
    pub results_row_even: Style,
    pub results_row_odd: Style,
    pub results_selected: Style,
    pub results_header_selected: Style,
    pub results_null: Style,
    pub results_footer: Style,
    pub results_empty: Style,
    pub results_running: Style,
    pub results_error_title: Style,
    pub results_error_text: Style,

    // Command bar
    pub command_prompt: Style,
    pub command_input: Style,
    pub command_hint: Style,

    // Help overlay
    pub help_section: Style,
    pub help_key: Style,
    pub help_desc: Style,

    // Status messages
    pub status_success: Style,
    pub status_error: Style,
    pub status_info: Style,
    pub status_warning: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Borders
            border_focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border_unfocused: Style::default().fg(Color::DarkGray),

            // Database browser
            tree_database: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tree_table: Style::default().fg(Color::Green),
            tree_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tree_placeholder: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            // Tab bar
            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            tab_overflow: Style::default().fg(Color::DarkGray),

            // Query editor
            editor_text: Style::default().fg(Color::White),
            editor_keyword: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            editor_string: Style::default().fg(Color::Green),
            editor_identifier: Style::default().fg(Color::Cyan),
            editor_number: Style::default().fg(Color::Magenta),
            editor_comment: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            editor_line_number: Style::default().fg(Color::DarkGray),
            editor_line_number_active: Style::default().fg(Color::Yellow),

            // Results grid
            results_header: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            results_row_even: Style::default().fg(Color::White),
            results_row_odd: Style::default().fg(Color::Gray),
            results_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow),
            results_null: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            results_header_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            results_footer: Style::default().fg(Color::DarkGray),
            results_empty: Style::default().fg(Color::DarkGray),
            results_running: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
            results_error_title: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            results_error_text: Style::default().fg(Color::Red),

            // Command bar
            command_prompt: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            command_input: Style::default().fg(Color::White),
            command_hint: Style::default().fg(Color::DarkGray),

            // Help overlay
            help_section: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Yellow),
            help_desc: Style::default().fg(Color::White),

            // Status messages
            status_success: Style::default().fg(Color::Green),
            status_error: Style::default().fg(Color::Red),
            status_info: Style::default().fg(Color::Blue),
            status_warning: Style::default().fg(Color::Yellow),
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Get border style based on focus
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }
}
