//! Command bar widget
//!
//! One-line input for `/` commands. Enter and Esc are resolved by the keymap;
//! this widget only edits text.

use crate::ui::theme::Theme;
use crate::ui::{Component, ComponentAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "/";

/// Command bar component
#[derive(Default)]
pub struct CommandBar {
    input: String,
    /// Cursor position in chars
    cursor: usize,
    active: bool,
}

impl CommandBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate with an empty input
    pub fn activate(&mut self) {
        self.active = true;
        self.input.clear();
        self.cursor = 0;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.input.clear();
        self.cursor = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn input_text(&self) -> &str {
        &self.input
    }

    fn byte_pos(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map_or(self.input.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_pos();
        self.input.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the char before the cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_pos();
            self.input.remove(at);
        }
    }

    /// Insert pasted text, flattened to one line
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.insert_char(c);
        }
    }
}

impl Component for CommandBar {
    fn handle_key(&mut self, key: KeyEvent) -> ComponentAction {
        if !self.active {
            return ComponentAction::Ignored;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char(c) if !ctrl => self.insert_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let at = self.byte_pos();
                    self.input.remove(at);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            _ => return ComponentAction::Ignored,
        }
        ComponentAction::Consumed
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let line = Line::from(vec![
            Span::styled(PROMPT, theme.command_prompt),
            Span::styled(self.input.as_str(), theme.command_input),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        if focused {
            let before: String = self.input.chars().take(self.cursor).collect();
            let x = area.x + (PROMPT.width() + before.width()) as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
    }
}
