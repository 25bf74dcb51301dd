//! Tab bookkeeping for the query workspace
//!
//! A [`TabSet`] owns the open tabs, one SQL text buffer per tab, the selected
//! index and the single editor widget shared by all tabs. Switching tabs does
//! not create a new editor: the selected tab's buffer is loaded into it, and
//! every edit is written back to that buffer.
//!
//! The editor's lifetime follows the view. It is created lazily the first
//! time the editor area is on screen while a tab is selected, and destroyed
//! when the last tab closes. Until then buffers are authoritative and the
//! pending init is recorded in `needs_editor_init`.
//!
//! The set also carries the inputs of the results grid: the query text to
//! run (`trigger_query`), whether execution was requested, and the database
//! and tab the grid should show.

use crossterm::event::KeyEvent;

/// Request to open (or re-focus) the tab for a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabData {
    pub db_name: String,
    pub table_name: String,
}

impl TabData {
    pub fn new(db_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
            table_name: table_name.into(),
        }
    }

    /// Parse `db.table`. The table part may itself contain dots.
    pub fn parse(qualified: &str) -> Option<Self> {
        let (db, table) = qualified.trim().split_once('.')?;
        if db.is_empty() || table.is_empty() {
            return None;
        }
        Some(Self::new(db, table))
    }
}

/// An open tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    /// `"{db_name}.{table_name}"`, unique within a [`TabSet`]
    pub id: String,
    pub db_name: String,
    pub table_name: String,
}

/// Options the editor widget is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub line_numbers: bool,
    pub smart_indent: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            smart_indent: true,
        }
    }
}

/// What a key press did to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// Text changed; the owner must resync its buffer
    Changed,
    /// Cursor moved, text untouched
    Moved,
    /// Key not handled
    Ignored,
}

/// The text-editing widget a [`TabSet`] drives
pub trait EditorWidget {
    /// Create a widget with the given options
    fn create(options: &EditorOptions) -> Self
    where
        Self: Sized;

    /// Current text
    fn value(&self) -> String;

    /// Replace the whole text
    fn set_value(&mut self, value: &str);

    /// Feed a key press
    fn handle_key(&mut self, key: KeyEvent) -> EditorEvent;

    /// Insert text at the cursor (paste)
    fn insert_text(&mut self, text: &str) -> EditorEvent;

    /// Tear the widget down
    fn destroy(self)
    where
        Self: Sized,
    {
    }
}

/// Outcome of [`TabSet::add_tab`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabOpen {
    /// A new tab was appended at this index and selected
    Opened(usize),
    /// The tab already existed and was selected
    Reselected(usize),
    /// `max_tabs` reached; nothing changed
    LimitReached,
}

/// What the results grid needs to run a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Identifies this execution; outcomes of older runs are ignored
    pub run_id: u64,
    pub tab_id: String,
    pub database: String,
    pub sql: String,
}

/// Open tabs, their buffers, and the shared editor
pub struct TabSet<E: EditorWidget> {
    tabs: Vec<TabInfo>,
    /// One buffer per tab, same order as `tabs`
    contents: Vec<String>,
    selected: Option<usize>,
    editor: Option<E>,
    editor_options: EditorOptions,
    needs_editor_init: bool,

    // Results grid inputs
    trigger_query: String,
    execute_triggered: bool,
    selected_db: String,
    current_tab_id: String,

    /// 0 = unlimited
    max_tabs: usize,
}

impl<E: EditorWidget> TabSet<E> {
    pub fn new(editor_options: EditorOptions, max_tabs: usize) -> Self {
        Self {
            tabs: Vec::new(),
            contents: Vec::new(),
            selected: None,
            editor: None,
            editor_options,
            needs_editor_init: false,
            trigger_query: String::new(),
            execute_triggered: false,
            selected_db: String::new(),
            current_tab_id: String::new(),
            max_tabs,
        }
    }

    // ── Inputs ───────────────────────────────────────────────

    /// New tab data arrived. Opens a tab when both names are present.
    pub fn on_tab_data(&mut self, data: &TabData) -> Option<TabOpen> {
        if data.db_name.is_empty() || data.table_name.is_empty() {
            return None;
        }
        Some(self.add_tab(&data.db_name, &data.table_name))
    }

    // ── View lifecycle ───────────────────────────────────────

    /// First render finished. Creates the editor if its area is mounted and
    /// a tab is selected, and loads that tab so no init is left pending.
    pub fn after_view_init(&mut self, editor_mounted: bool) {
        if !editor_mounted || self.editor.is_some() {
            return;
        }
        let Some(idx) = self.selected else { return };
        self.initialize_editor();
        if let Some(editor) = self.editor.as_mut() {
            editor.set_value(&self.contents[idx]);
        }
        self.needs_editor_init = false;
    }

    /// Called after every render. Performs a pending editor init once the
    /// editor area exists and a tab is selected.
    pub fn after_view_checked(&mut self, editor_mounted: bool) {
        if !self.needs_editor_init || !editor_mounted || self.editor.is_some() {
            return;
        }
        let Some(idx) = self.selected else { return };
        self.initialize_editor();
        if let Some(editor) = self.editor.as_mut() {
            editor.set_value(&self.contents[idx]);
        }
        self.needs_editor_init = false;
    }

    fn initialize_editor(&mut self) {
        if self.editor.is_none() {
            tracing::debug!("creating editor widget");
            self.editor = Some(E::create(&self.editor_options));
        }
    }

    // ── Tab operations ───────────────────────────────────────

    /// Open the tab for `db_name.table_name`, or select it if already open.
    pub fn add_tab(&mut self, db_name: &str, table_name: &str) -> TabOpen {
        let id = format!("{}.{}", db_name, table_name);
        if let Some(idx) = self.tabs.iter().position(|t| t.id == id) {
            self.select_tab(idx);
            return TabOpen::Reselected(idx);
        }
        if self.max_tabs > 0 && self.tabs.len() >= self.max_tabs {
            return TabOpen::LimitReached;
        }

        tracing::info!(tab = %id, "opening tab");
        self.tabs.push(TabInfo {
            id,
            db_name: db_name.to_string(),
            table_name: table_name.to_string(),
        });
        self.contents
            .push(format!("SELECT * FROM {}.{};", db_name, table_name));
        let idx = self.tabs.len() - 1;
        self.select_tab(idx);

        if self.editor.is_none() {
            self.needs_editor_init = true;
        }
        TabOpen::Opened(idx)
    }

    /// Make `idx` the selected tab and load its buffer into the editor.
    /// Returns false if `idx` is out of range.
    pub fn select_tab(&mut self, idx: usize) -> bool {
        let Some(tab) = self.tabs.get(idx) else {
            return false;
        };
        if self.contents.len() <= idx {
            self.contents.resize(idx + 1, String::new());
        }

        self.selected = Some(idx);
        self.selected_db = tab.db_name.clone();
        self.trigger_query = self.contents[idx].clone();
        self.current_tab_id = tab.id.clone();

        if let Some(editor) = self.editor.as_mut() {
            editor.set_value(&self.contents[idx]);
        }
        self.execute_triggered = false;
        true
    }

    /// Close the tab at `idx`.
    ///
    /// Selection moves to the tab before it (or the first tab). Closing the
    /// last tab destroys the editor; it is recreated when a tab opens again.
    /// Returns the closed tab, or `None` if `idx` is out of range.
    pub fn close_tab(&mut self, idx: usize) -> Option<TabInfo> {
        if idx >= self.tabs.len() {
            return None;
        }
        let closed = self.tabs.remove(idx);
        self.contents.remove(idx);
        tracing::info!(tab = %closed.id, "closed tab");

        self.selected = if self.tabs.is_empty() {
            None
        } else {
            Some(idx.saturating_sub(1))
        };

        match self.selected {
            Some(sel) => {
                self.trigger_query = self.contents[sel].clone();
                self.selected_db = self.tabs[sel].db_name.clone();
                self.current_tab_id = self.tabs[sel].id.clone();
                match self.editor.as_mut() {
                    Some(editor) => editor.set_value(&self.contents[sel]),
                    None => self.needs_editor_init = true,
                }
            }
            None => {
                if let Some(editor) = self.editor.take() {
                    tracing::debug!("destroying editor widget");
                    editor.destroy();
                }
                self.needs_editor_init = true;
                self.trigger_query.clear();
                self.selected_db.clear();
                self.current_tab_id.clear();
                self.execute_triggered = false;
            }
        }
        Some(closed)
    }

    /// Close the selected tab
    pub fn close_selected(&mut self) -> Option<TabInfo> {
        let idx = self.selected?;
        self.close_tab(idx)
    }

    /// Select the next tab, wrapping around
    pub fn select_next(&mut self) {
        if let Some(idx) = self.selected
            && self.tabs.len() > 1
        {
            self.select_tab((idx + 1) % self.tabs.len());
        }
    }

    /// Select the previous tab, wrapping around
    pub fn select_prev(&mut self) {
        if let Some(idx) = self.selected
            && self.tabs.len() > 1
        {
            self.select_tab((idx + self.tabs.len() - 1) % self.tabs.len());
        }
    }

    // ── Toolbar actions ──────────────────────────────────────

    /// Execute button: hand the selected buffer to the results grid.
    /// Returns false when no tab is selected.
    pub fn handle_exec_query_click(&mut self) -> bool {
        let Some(idx) = self.selected else {
            return false;
        };
        self.trigger_query = self.contents[idx].clone();
        self.execute_triggered = true;
        true
    }

    /// Discard button: empty the editor and the selected buffer.
    /// Returns false when no tab is selected.
    pub fn on_disc_query_click(&mut self) -> bool {
        let Some(idx) = self.selected else {
            return false;
        };
        if let Some(editor) = self.editor.as_mut() {
            editor.set_value("");
        }
        self.contents[idx].clear();
        self.trigger_query.clear();
        self.execute_triggered = false;
        true
    }

    /// Replace the selected tab's text (e.g. after formatting)
    pub fn replace_content(&mut self, text: String) -> bool {
        let Some(idx) = self.selected else {
            return false;
        };
        if let Some(editor) = self.editor.as_mut() {
            editor.set_value(&text);
        }
        self.contents[idx] = text;
        true
    }

    // ── Editor plumbing ──────────────────────────────────────

    /// Change notification from the editor: copy its text into the selected buffer
    pub fn on_editor_change(&mut self) {
        if let (Some(editor), Some(idx)) = (self.editor.as_ref(), self.selected) {
            self.contents[idx] = editor.value();
        }
    }

    /// Route a key press to the editor. Returns true if the editor used it.
    pub fn handle_editor_key(&mut self, key: KeyEvent) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        match editor.handle_key(key) {
            EditorEvent::Changed => {
                self.on_editor_change();
                true
            }
            EditorEvent::Moved => true,
            EditorEvent::Ignored => false,
        }
    }

    /// Paste into the editor. Returns true if an editor was there to take it.
    pub fn paste(&mut self, text: &str) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        if editor.insert_text(text) == EditorEvent::Changed {
            self.on_editor_change();
        }
        true
    }

    // ── Accessors ────────────────────────────────────────────

    pub fn tabs(&self) -> &[TabInfo] {
        &self.tabs
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_tab(&self) -> Option<&TabInfo> {
        self.selected.and_then(|i| self.tabs.get(i))
    }

    /// Text buffer of the tab at `idx`
    pub fn content(&self, idx: usize) -> Option<&str> {
        self.contents.get(idx).map(String::as_str)
    }

    /// Text buffer of the selected tab
    pub fn selected_content(&self) -> Option<&str> {
        self.selected.and_then(|i| self.content(i))
    }

    pub fn editor(&self) -> Option<&E> {
        self.editor.as_ref()
    }

    pub fn has_editor(&self) -> bool {
        self.editor.is_some()
    }

    pub fn needs_editor_init(&self) -> bool {
        self.needs_editor_init
    }

    pub fn trigger_query(&self) -> &str {
        &self.trigger_query
    }

    pub fn is_execute_triggered(&self) -> bool {
        self.execute_triggered
    }

    pub fn selected_db(&self) -> &str {
        &self.selected_db
    }

    pub fn current_tab_id(&self) -> &str {
        &self.current_tab_id
    }

    pub fn max_tabs(&self) -> usize {
        self.max_tabs
    }

    /// The pending execution, if the execute button was pressed since the
    /// last selection change, tagged with `run_id`
    pub fn execution_request(&self, run_id: u64) -> Option<ExecutionRequest> {
        if !self.execute_triggered || self.selected.is_none() {
            return None;
        }
        Some(ExecutionRequest {
            run_id,
            tab_id: self.current_tab_id.clone(),
            database: self.selected_db.clone(),
            sql: self.trigger_query.clone(),
        })
    }
}
