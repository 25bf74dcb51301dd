//! Help overlay: keybinding reference modal
//!
//! Displays all keybindings organized by panel context as a centered popup.

use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Help overlay showing keybinding reference
#[derive(Default)]
pub struct HelpOverlay {
    visible: bool,
    scroll_offset: usize,
}

/// Total number of content lines in the help text
const HELP_LINE_COUNT: usize = 49;

impl HelpOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.scroll_offset = 0;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.scroll_offset = 0;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset + 1 < HELP_LINE_COUNT {
            self.scroll_offset += 1;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(20);
    }

    pub fn page_down(&mut self) {
        self.scroll_offset = (self.scroll_offset + 20).min(HELP_LINE_COUNT.saturating_sub(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = HELP_LINE_COUNT.saturating_sub(1);
    }

    /// Build styled help content lines
    fn build_lines<'a>(&self, theme: &Theme) -> Vec<Line<'a>> {
        let section = theme.help_section;
        let key = theme.help_key;
        let desc = theme.help_desc;
        let blank = Line::from("");

        vec![
            Line::from(Span::styled("Global", section)),
            help_line("  Ctrl+Q", "Quit", key, desc),
            help_line("  Tab / Shift+Tab", "Cycle panel focus", key, desc),
            help_line("  Ctrl+P", "Command bar", key, desc),
            help_line("  F1", "Help", key, desc),
            help_line("  Ctrl+W", "Close tab", key, desc),
            help_line("  Ctrl+N / Ctrl+B", "Next / previous tab", key, desc),
            blank.clone(),
            Line::from(Span::styled("Editor", section)),
            help_line("  F5 / Ctrl+Enter", "Execute query", key, desc),
            help_line("  Ctrl+L", "Discard query", key, desc),
            help_line("  Ctrl+Alt+F", "Format query", key, desc),
            help_line("  Esc", "Cancel running query", key, desc),
            help_line("  Ctrl+Home / Ctrl+End", "Start / end of query", key, desc),
            blank.clone(),
            Line::from(Span::styled("Results", section)),
            help_line("  j/k  \u{2191}/\u{2193}", "Navigate rows", key, desc),
            help_line("  h/l  \u{2190}/\u{2192}", "Navigate columns", key, desc),
            help_line("  y", "Copy cell", key, desc),
            help_line("  Y", "Copy row", key, desc),
            help_line("  g / G", "Top / Bottom", key, desc),
            help_line("  Home / End", "First / Last column", key, desc),
            help_line("  PgUp / PgDn", "Page up / down", key, desc),
            blank.clone(),
            Line::from(Span::styled("Databases", section)),
            help_line("  j/k  \u{2191}/\u{2193}", "Navigate", key, desc),
            help_line("  Enter", "Open table / Expand", key, desc),
            help_line("  Space", "Toggle expand", key, desc),
            help_line("  h", "Collapse", key, desc),
            help_line("  r", "Reload databases", key, desc),
            blank.clone(),
            Line::from(Span::styled("Command Bar", section)),
            help_line("  Enter", "Execute command", key, desc),
            help_line("  Esc", "Cancel", key, desc),
            blank.clone(),
            Line::from(Span::styled("Commands", section)),
            help_line("  /open db.table", "Open a query tab", key, desc),
            help_line("  /close [N]", "Close current (or Nth) tab", key, desc),
            help_line("  /tab N", "Select the Nth tab", key, desc),
            help_line("  /exec", "Execute query", key, desc),
            help_line("  /discard", "Discard query", key, desc),
            help_line("  /format", "Format query", key, desc),
            help_line("  /refresh", "Reload databases", key, desc),
            help_line("  /help", "Show this help", key, desc),
            help_line("  /quit", "Quit", key, desc),
            blank.clone(),
            Line::from(Span::styled("Help", section)),
            help_line("  j/k  PgUp/PgDn", "Scroll", key, desc),
            help_line("  Esc / q", "Close", key, desc),
        ]
    }

    /// Render the help content into the given area
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if area.height == 0 {
            return;
        }
        let lines: Vec<Line> = self
            .build_lines(theme)
            .into_iter()
            .skip(self.scroll_offset)
            .take(area.height as usize)
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// Build a single help line: "  key           description"
fn help_line<'a>(
    key_text: &'a str,
    desc_text: &'a str,
    key_style: Style,
    desc_style: Style,
) -> Line<'a> {
    let padded_key = format!("{:<24}", key_text);
    Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc_text, desc_style),
    ])
}
