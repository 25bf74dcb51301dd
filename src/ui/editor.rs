//! Query editor widget
//!
//! Multi-line SQL editor with syntax highlighting, line numbers and smart
//! indentation. Implements [`EditorWidget`] so a [`TabSet`](crate::tabs::TabSet)
//! can create, load, read and destroy it.
//!
//! Cursor columns are counted in chars, never bytes.

use crate::tabs::{EditorEvent, EditorOptions, EditorWidget};
use crate::ui::Component;
use crate::ui::highlight::{TokenKind, highlight_sql};
use crate::ui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// SQL editor component
pub struct SqlEditor {
    /// Text, one entry per line (never empty)
    lines: Vec<String>,
    /// Cursor position (line, char column)
    cursor: (usize, usize),
    options: EditorOptions,
}

impl SqlEditor {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            lines: vec![String::new()],
            cursor: (0, 0),
            options,
        }
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn current_line_len(&self) -> usize {
        self.lines[self.cursor.0].chars().count()
    }

    fn insert_char(&mut self, c: char) {
        let (row, col) = self.cursor;
        let at = byte_index(&self.lines[row], col);
        self.lines[row].insert(at, c);
        self.cursor.1 += 1;
    }

    /// Split the line at the cursor. With smart indent the new line inherits
    /// the current line's leading whitespace.
    fn insert_newline(&mut self) {
        let (row, col) = self.cursor;
        let at = byte_index(&self.lines[row], col);
        let rest = self.lines[row].split_off(at);
        let indent: String = if self.options.smart_indent {
            self.lines[row]
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect()
        } else {
            String::new()
        };
        let indent_len = indent.chars().count();
        self.lines.insert(row + 1, indent + &rest);
        self.cursor = (row + 1, indent_len);
    }

    fn backspace(&mut self) -> bool {
        let (row, col) = self.cursor;
        if col > 0 {
            let at = byte_index(&self.lines[row], col - 1);
            self.lines[row].remove(at);
            self.cursor.1 -= 1;
            true
        } else if row > 0 {
            let line = self.lines.remove(row);
            let prev_len = self.lines[row - 1].chars().count();
            self.lines[row - 1].push_str(&line);
            self.cursor = (row - 1, prev_len);
            true
        } else {
            false
        }
    }

    fn delete(&mut self) -> bool {
        let (row, col) = self.cursor;
        if col < self.current_line_len() {
            let at = byte_index(&self.lines[row], col);
            self.lines[row].remove(at);
            true
        } else if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
            true
        } else {
            false
        }
    }

    fn move_left(&mut self) {
        if self.cursor.1 > 0 {
            self.cursor.1 -= 1;
        } else if self.cursor.0 > 0 {
            self.cursor.0 -= 1;
            self.cursor.1 = self.current_line_len();
        }
    }

    fn move_right(&mut self) {
        if self.cursor.1 < self.current_line_len() {
            self.cursor.1 += 1;
        } else if self.cursor.0 + 1 < self.lines.len() {
            self.cursor = (self.cursor.0 + 1, 0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.0 > 0 {
            self.cursor.0 -= 1;
            self.cursor.1 = self.cursor.1.min(self.current_line_len());
        }
    }

    fn move_down(&mut self) {
        if self.cursor.0 + 1 < self.lines.len() {
            self.cursor.0 += 1;
            self.cursor.1 = self.cursor.1.min(self.current_line_len());
        }
    }

    fn gutter_width(&self) -> u16 {
        if self.options.line_numbers {
            self.lines.len().to_string().len() as u16 + 1
        } else {
            0
        }
    }

    /// Build highlighted lines for the whole buffer
    fn styled_lines(&self, theme: &Theme) -> Vec<Line<'_>> {
        let mut in_block_comment = false;
        self.lines
            .iter()
            .map(|line| {
                let (tokens, still_open) = highlight_sql(line, in_block_comment);
                in_block_comment = still_open;
                let spans: Vec<Span> = tokens
                    .into_iter()
                    .map(|(kind, range)| {
                        let style = match kind {
                            TokenKind::Keyword => theme.editor_keyword,
                            TokenKind::String => theme.editor_string,
                            TokenKind::QuotedIdent => theme.editor_identifier,
                            TokenKind::Number => theme.editor_number,
                            TokenKind::Comment => theme.editor_comment,
                            TokenKind::Normal => theme.editor_text,
                        };
                        Span::styled(&line[range], style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Byte offset of char column `col` in `line` (clamped to the end)
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(i, _)| i)
}

/// First visible index so that `pos` lies within a window of `size`
fn scroll_for(pos: usize, size: usize) -> usize {
    if size == 0 || pos < size {
        0
    } else {
        pos + 1 - size
    }
}

impl EditorWidget for SqlEditor {
    fn create(options: &EditorOptions) -> Self {
        Self::new(*options)
    }

    fn value(&self) -> String {
        self.lines.join("\n")
    }

    fn set_value(&mut self, value: &str) {
        self.lines = value.split('\n').map(String::from).collect();
        self.cursor = (0, 0);
    }

    fn handle_key(&mut self, key: KeyEvent) -> EditorEvent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char(c) if !ctrl && !alt => {
                self.insert_char(c);
                EditorEvent::Changed
            }
            KeyCode::Enter if key.modifiers.is_empty() => {
                self.insert_newline();
                EditorEvent::Changed
            }
            KeyCode::Backspace => {
                if self.backspace() {
                    EditorEvent::Changed
                } else {
                    EditorEvent::Moved
                }
            }
            KeyCode::Delete => {
                if self.delete() {
                    EditorEvent::Changed
                } else {
                    EditorEvent::Moved
                }
            }
            KeyCode::Left => {
                self.move_left();
                EditorEvent::Moved
            }
            KeyCode::Right => {
                self.move_right();
                EditorEvent::Moved
            }
            KeyCode::Up => {
                self.move_up();
                EditorEvent::Moved
            }
            KeyCode::Down => {
                self.move_down();
                EditorEvent::Moved
            }
            KeyCode::Home if ctrl => {
                self.cursor = (0, 0);
                EditorEvent::Moved
            }
            KeyCode::End if ctrl => {
                let last = self.lines.len() - 1;
                self.cursor = (last, self.lines[last].chars().count());
                EditorEvent::Moved
            }
            KeyCode::Home => {
                self.cursor.1 = 0;
                EditorEvent::Moved
            }
            KeyCode::End => {
                self.cursor.1 = self.current_line_len();
                EditorEvent::Moved
            }
            _ => EditorEvent::Ignored,
        }
    }

    fn insert_text(&mut self, text: &str) -> EditorEvent {
        if text.is_empty() {
            return EditorEvent::Ignored;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let (row, col) = self.cursor;
        let at = byte_index(&self.lines[row], col);
        let tail = self.lines[row].split_off(at);

        let mut pieces = normalized.split('\n');
        if let Some(first) = pieces.next() {
            self.lines[row].push_str(first);
        }
        let mut cur_row = row;
        for piece in pieces {
            cur_row += 1;
            self.lines.insert(cur_row, piece.to_string());
        }
        let cur_col = self.lines[cur_row].chars().count();
        self.lines[cur_row].push_str(&tail);
        self.cursor = (cur_row, cur_col);
        EditorEvent::Changed
    }
}

impl Component for SqlEditor {
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let gutter = self.gutter_width().min(area.width);
        let text_area = Rect::new(area.x + gutter, area.y, area.width - gutter, area.height);

        let (row, col) = self.cursor;
        let line = &self.lines[row];
        let cursor_x = UnicodeWidthStr::width(&line[..byte_index(line, col)]);
        let v_scroll = scroll_for(row, area.height as usize);
        let h_scroll = scroll_for(cursor_x, text_area.width as usize);

        if gutter > 0 {
            let numbers: Vec<Line> = (1..=self.lines.len())
                .map(|n| {
                    let style = if n == row + 1 {
                        theme.editor_line_number_active
                    } else {
                        theme.editor_line_number
                    };
                    Line::from(Span::styled(
                        format!("{:>width$} ", n, width = gutter as usize - 1),
                        style,
                    ))
                })
                .collect();
            frame.render_widget(
                Paragraph::new(numbers).scroll((v_scroll as u16, 0)),
                Rect::new(area.x, area.y, gutter, area.height),
            );
        }

        frame.render_widget(
            Paragraph::new(self.styled_lines(theme)).scroll((v_scroll as u16, h_scroll as u16)),
            text_area,
        );

        if focused && text_area.width > 0 {
            let x = text_area.x + (cursor_x - h_scroll) as u16;
            let y = area.y + (row - v_scroll) as u16;
            frame.set_cursor_position((x, y));
        }
    }
}
