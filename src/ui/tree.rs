//! Database browser widget
//!
//! Two-level tree: databases, each expandable to its tables. Enter on a table
//! asks for a query tab.

use crate::backend::DatabaseEntry;
use crate::tabs::TabData;
use crate::ui::Component;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use std::collections::HashSet;

/// A row of the flattened tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserItem {
    /// Index into the database list
    Database(usize),
    /// (database index, table index)
    Table(usize, usize),
}

/// Database browser component
#[derive(Default)]
pub struct DatabaseBrowser {
    databases: Vec<DatabaseEntry>,
    /// Names of expanded databases
    expanded: HashSet<String>,
    /// Index into the visible items
    selected: usize,
    loading: bool,
    error: Option<String>,
}

impl DatabaseBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetch is in flight
    pub fn set_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the database list. Expansion survives for databases that are
    /// still present; the selection is clamped.
    pub fn set_databases(&mut self, databases: Vec<DatabaseEntry>) {
        self.expanded
            .retain(|name| databases.iter().any(|d| &d.name == name));
        self.databases = databases;
        self.loading = false;
        self.error = None;
        self.selected = self
            .selected
            .min(self.visible_items().len().saturating_sub(1));
    }

    pub fn set_error(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn databases(&self) -> &[DatabaseEntry] {
        &self.databases
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    /// Flatten the tree into display rows
    pub fn visible_items(&self) -> Vec<BrowserItem> {
        let mut items = Vec::new();
        for (di, db) in self.databases.iter().enumerate() {
            items.push(BrowserItem::Database(di));
            if self.expanded.contains(&db.name) {
                items.extend((0..db.tables.len()).map(|ti| BrowserItem::Table(di, ti)));
            }
        }
        items
    }

    pub fn selected_item(&self) -> Option<BrowserItem> {
        self.visible_items().get(self.selected).copied()
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.visible_items().len() {
            self.selected += 1;
        }
    }

    /// Expand or collapse the selected database (or the table's database)
    pub fn toggle_expand(&mut self) {
        match self.selected_item() {
            Some(BrowserItem::Database(di)) => {
                let name = self.databases[di].name.clone();
                if !self.expanded.remove(&name) {
                    self.expanded.insert(name);
                }
            }
            Some(BrowserItem::Table(..)) => self.collapse_current(),
            None => {}
        }
    }

    /// Collapse the selected database, or the parent of the selected table
    /// (moving the selection onto it)
    pub fn collapse_current(&mut self) {
        let di = match self.selected_item() {
            Some(BrowserItem::Database(di)) | Some(BrowserItem::Table(di, _)) => di,
            None => return,
        };
        self.expanded.remove(&self.databases[di].name);
        if let Some(pos) = self
            .visible_items()
            .iter()
            .position(|item| *item == BrowserItem::Database(di))
        {
            self.selected = pos;
        }
    }

    /// Enter: toggles a database; on a table returns the tab to open
    pub fn activate(&mut self) -> Option<TabData> {
        match self.selected_item()? {
            BrowserItem::Database(_) => {
                self.toggle_expand();
                None
            }
            BrowserItem::Table(di, ti) => {
                let db = &self.databases[di];
                Some(TabData::new(db.name.as_str(), db.tables[ti].as_str()))
            }
        }
    }
}

impl Component for DatabaseBrowser {
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        if area.height == 0 {
            return;
        }

        let placeholder = if let Some(ref error) = self.error {
            Some((format!("Failed to load databases: {}", error), theme.status_error))
        } else if self.loading && self.databases.is_empty() {
            Some(("Loading databases...".to_string(), theme.tree_placeholder))
        } else if self.databases.is_empty() {
            Some(("No databases".to_string(), theme.tree_placeholder))
        } else {
            None
        };
        if let Some((text, style)) = placeholder {
            frame.render_widget(
                Paragraph::new(text)
                    .style(style)
                    .wrap(ratatui::widgets::Wrap { trim: true }),
                area,
            );
            return;
        }

        let items = self.visible_items();
        let height = area.height as usize;
        let scroll = self.selected.saturating_sub(height.saturating_sub(1));

        let lines: Vec<Line> = items
            .iter()
            .enumerate()
            .skip(scroll)
            .take(height)
            .map(|(idx, item)| {
                let (text, base) = match *item {
                    BrowserItem::Database(di) => {
                        let db = &self.databases[di];
                        let marker = if self.expanded.contains(&db.name) {
                            "▼"
                        } else {
                            "▶"
                        };
                        (format!("{} {}", marker, db.name), theme.tree_database)
                    }
                    BrowserItem::Table(di, ti) => (
                        format!("    {}", self.databases[di].tables[ti]),
                        theme.tree_table,
                    ),
                };
                let style = if focused && idx == self.selected {
                    theme.tree_selected
                } else {
                    base
                };
                Line::from(Span::styled(text, style))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }
}
