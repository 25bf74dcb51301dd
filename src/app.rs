//! Application state and event handling
//!
//! Central state machine: events come in, state updates, actions go out.

use crate::backend::{DatabaseEntry, QueryResults};
use crate::commands::{Command, parse_command};
use crate::config::Settings;
use crate::error::Result;
use crate::keymap::{KeyAction, KeyMap};
use crate::tabs::{EditorOptions, ExecutionRequest, TabData, TabOpen, TabSet};
use crate::ui::command_bar::CommandBar;
use crate::ui::editor::SqlEditor;
use crate::ui::help::HelpOverlay;
use crate::ui::results::ResultsGrid;
use crate::ui::theme::Theme;
use crate::ui::tree::DatabaseBrowser;
use crate::ui::Component;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

/// Main application state
pub struct App {
    /// Which panel currently has focus
    pub focus: PanelFocus,

    /// Focus before a modal was opened (to restore on Escape)
    pub previous_focus: PanelFocus,

    /// UI Components
    pub browser: DatabaseBrowser,
    pub results: ResultsGrid,
    pub command_bar: CommandBar,
    pub help: HelpOverlay,

    /// Open tabs and the shared query editor
    pub tabs: TabSet<SqlEditor>,

    /// Data-driven keybinding configuration
    pub keymap: KeyMap,

    /// UI theme (created once, reused every frame)
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<StatusMessage>,

    /// Shown in the status bar
    pub api_url: String,

    /// Requested browser panel width
    pub browser_width: u16,

    /// Whether the first frame has been drawn
    view_initialized: bool,

    /// Persistent clipboard handle (kept alive to avoid Linux clipboard drop race)
    clipboard: Option<arboard::Clipboard>,

    /// Error from clipboard initialization (preserved for diagnostics)
    clipboard_error: Option<String>,

    /// Id handed to the next query execution
    next_run_id: u64,

    /// Whether the application is running
    pub running: bool,
}

/// Panel focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelFocus {
    Browser,
    Editor,
    Results,
    CommandBar,
    Help,
}

/// Status message with severity level
pub struct StatusMessage {
    pub message: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Application events from the event loop
pub enum AppEvent {
    /// Keyboard input event
    Key(KeyEvent),
    /// Bracketed paste event
    Paste(String),
    /// Terminal resize event
    Resize,
    /// Database list fetched
    DatabasesLoaded(Vec<DatabaseEntry>),
    /// Database list fetch failed
    DatabasesFailed(String),
    /// Query execution completed successfully
    QueryCompleted {
        tab_id: String,
        run_id: u64,
        results: QueryResults,
    },
    /// Query execution failed
    QueryFailed {
        tab_id: String,
        run_id: u64,
        error: String,
    },
}

/// Actions returned by event handlers for the main loop to execute
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    LoadDatabases,
    ExecuteQuery(ExecutionRequest),
    CancelQuery { tab_id: String },
    Quit,
    None,
}

impl App {
    pub fn new() -> Self {
        Self::new_with_settings(&Settings::default())
    }

    /// Create an app with custom settings (API URL, editor options, tab limit)
    pub fn new_with_settings(settings: &Settings) -> Self {
        let (clipboard, clipboard_error) = match arboard::Clipboard::new() {
            Ok(c) => (Some(c), None),
            Err(e) => (None, Some(e.to_string())),
        };
        let editor_options = EditorOptions {
            line_numbers: settings.editor.line_numbers,
            smart_indent: settings.editor.smart_indent,
        };
        Self {
            focus: PanelFocus::Browser,
            previous_focus: PanelFocus::Browser,
            browser: DatabaseBrowser::new(),
            results: ResultsGrid::new(),
            command_bar: CommandBar::new(),
            help: HelpOverlay::new(),
            tabs: TabSet::new(editor_options, settings.ui.max_tabs),
            keymap: KeyMap::default(),
            theme: Theme::default(),
            status_message: None,
            api_url: settings.backend.api_url.clone(),
            browser_width: settings.ui.browser_width,
            view_initialized: false,
            clipboard,
            clipboard_error,
            next_run_id: 1,
            running: true,
        }
    }

    /// Handle an application event and return resulting action
    pub fn handle_event(&mut self, event: AppEvent) -> Result<Action> {
        match event {
            AppEvent::Key(key) => Ok(self.handle_key(key)),
            AppEvent::Paste(data) => {
                match self.focus {
                    PanelFocus::Editor => {
                        self.tabs.paste(&data);
                    }
                    PanelFocus::CommandBar => self.command_bar.insert_str(&data),
                    _ => {}
                }
                Ok(Action::None)
            }
            AppEvent::Resize => Ok(Action::None),
            AppEvent::DatabasesLoaded(databases) => {
                let count = databases.len();
                self.browser.set_databases(databases);
                self.set_status(format!("Loaded {} databases", count), StatusLevel::Info);
                Ok(Action::None)
            }
            AppEvent::DatabasesFailed(err) => {
                self.browser.set_error(err.clone());
                self.set_status(
                    format!("Failed to load databases: {}", err),
                    StatusLevel::Error,
                );
                Ok(Action::None)
            }
            AppEvent::QueryCompleted {
                tab_id,
                run_id,
                results,
            } => {
                let message = match results.affected_rows {
                    Some(n) => format!("{} rows affected", n),
                    None => format!(
                        "{} rows in {:.1}ms",
                        results.row_count,
                        results.execution_time.as_secs_f64() * 1000.0
                    ),
                };
                if self.results.complete(&tab_id, run_id, results) {
                    if self.tabs.current_tab_id() == tab_id && self.focus == PanelFocus::Editor {
                        self.focus = PanelFocus::Results;
                    }
                    self.set_status(format!("{}: {}", tab_id, message), StatusLevel::Success);
                }
                Ok(Action::None)
            }
            AppEvent::QueryFailed {
                tab_id,
                run_id,
                error,
            } => {
                // Cancelled, closed or superseded runs are dropped by the grid
                if self.results.fail(&tab_id, run_id, error) {
                    self.set_status(format!("{}: query failed", tab_id), StatusLevel::Error);
                }
                Ok(Action::None)
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        self.status_message = None;

        // Try KeyMap first: global bindings, then panel-specific
        if let Some(key_action) = self.keymap.resolve(self.focus, key) {
            // Suppress global actions in modal panels so the key does not
            // fall through to the component either
            let modal = matches!(self.focus, PanelFocus::CommandBar | PanelFocus::Help);
            match key_action {
                KeyAction::OpenCommandBar if self.focus == PanelFocus::CommandBar => {
                    return Action::None;
                }
                KeyAction::ShowHelp if self.focus == PanelFocus::Help => {
                    return Action::None;
                }
                KeyAction::CycleFocus
                | KeyAction::CycleFocusReverse
                | KeyAction::CloseTab
                | KeyAction::NextTab
                | KeyAction::PrevTab
                    if modal =>
                {
                    return Action::None;
                }
                _ => return self.execute_key_action(key_action),
            }
        }

        // Fall through to component for free-form text input (editor, command bar)
        match self.focus {
            PanelFocus::Editor => {
                self.tabs.handle_editor_key(key);
            }
            PanelFocus::CommandBar => {
                self.command_bar.handle_key(key);
            }
            _ => {}
        }
        Action::None
    }

    fn execute_key_action(&mut self, action: KeyAction) -> Action {
        match action {
            // ── Global ───────────────────────────────────────
            KeyAction::Quit => Action::Quit,
            KeyAction::OpenCommandBar => {
                self.open_command_bar();
                Action::None
            }
            KeyAction::CycleFocus => {
                self.cycle_focus();
                Action::None
            }
            KeyAction::CycleFocusReverse => {
                self.cycle_focus_reverse();
                Action::None
            }
            KeyAction::ShowHelp => {
                self.show_help();
                Action::None
            }
            KeyAction::CloseTab => self.close_tab(None),
            KeyAction::NextTab => {
                self.tabs.select_next();
                self.sync_results();
                Action::None
            }
            KeyAction::PrevTab => {
                self.tabs.select_prev();
                self.sync_results();
                Action::None
            }

            // ── Navigation ───────────────────────────────────
            KeyAction::MoveUp => {
                match self.focus {
                    PanelFocus::Results => self.results.move_up(),
                    PanelFocus::Browser => self.browser.move_up(),
                    PanelFocus::Help => self.help.scroll_up(),
                    _ => {}
                }
                Action::None
            }
            KeyAction::MoveDown => {
                match self.focus {
                    PanelFocus::Results => self.results.move_down(),
                    PanelFocus::Browser => self.browser.move_down(),
                    PanelFocus::Help => self.help.scroll_down(),
                    _ => {}
                }
                Action::None
            }
            KeyAction::MoveLeft => {
                self.results.move_left();
                Action::None
            }
            KeyAction::MoveRight => {
                self.results.move_right();
                Action::None
            }
            KeyAction::PageUp => {
                match self.focus {
                    PanelFocus::Results => self.results.page_up(),
                    PanelFocus::Help => self.help.page_up(),
                    _ => {}
                }
                Action::None
            }
            KeyAction::PageDown => {
                match self.focus {
                    PanelFocus::Results => self.results.page_down(),
                    PanelFocus::Help => self.help.page_down(),
                    _ => {}
                }
                Action::None
            }
            KeyAction::GoToTop => {
                match self.focus {
                    PanelFocus::Results => self.results.go_to_top(),
                    PanelFocus::Help => self.help.scroll_to_top(),
                    _ => {}
                }
                Action::None
            }
            KeyAction::GoToBottom => {
                match self.focus {
                    PanelFocus::Results => self.results.go_to_bottom(),
                    PanelFocus::Help => self.help.scroll_to_bottom(),
                    _ => {}
                }
                Action::None
            }
            KeyAction::Home => {
                self.results.go_to_home();
                Action::None
            }
            KeyAction::End => {
                self.results.go_to_end();
                Action::None
            }

            // ── Editor ───────────────────────────────────────
            KeyAction::ExecuteQuery => self.execute_query(),
            KeyAction::DiscardQuery => {
                self.discard_query();
                Action::None
            }
            KeyAction::FormatQuery => {
                self.format_query();
                Action::None
            }
            KeyAction::CancelQuery => self.cancel_query(),

            // ── Results ──────────────────────────────────────
            KeyAction::CopyCell => {
                if let Some(text) = self.results.selected_cell_text() {
                    self.copy_to_clipboard(&text);
                }
                Action::None
            }
            KeyAction::CopyRow => {
                if let Some(text) = self.results.selected_row_text() {
                    self.copy_to_clipboard(&text);
                }
                Action::None
            }

            // ── Browser ──────────────────────────────────────
            KeyAction::ToggleExpand => {
                self.browser.toggle_expand();
                Action::None
            }
            KeyAction::Activate => {
                if let Some(data) = self.browser.activate() {
                    self.open_tab(&data);
                }
                Action::None
            }
            KeyAction::Collapse => {
                self.browser.collapse_current();
                Action::None
            }
            KeyAction::RefreshDatabases => self.refresh_databases(),

            // ── Modal (command bar, help) ────────────────────
            KeyAction::Dismiss => {
                match self.focus {
                    PanelFocus::CommandBar => {
                        self.command_bar.deactivate();
                        self.focus = self.previous_focus;
                    }
                    PanelFocus::Help => {
                        self.help.hide();
                        self.focus = self.previous_focus;
                    }
                    _ => {}
                }
                Action::None
            }
            KeyAction::Submit => {
                if self.focus != PanelFocus::CommandBar {
                    return Action::None;
                }
                let input = self.command_bar.input_text().to_string();
                self.command_bar.deactivate();
                self.focus = self.previous_focus;

                if input.trim().is_empty() {
                    return Action::None;
                }
                match parse_command(&input) {
                    Ok(cmd) => self.execute_command(cmd),
                    Err(e) => {
                        self.set_status(e.to_string(), StatusLevel::Error);
                        Action::None
                    }
                }
            }
        }
    }

    fn execute_command(&mut self, command: Command) -> Action {
        tracing::debug!(?command, "executing command");
        match command {
            Command::Open(data) => {
                self.open_tab(&data);
                Action::None
            }
            Command::Close(idx) => self.close_tab(idx),
            Command::Tab(idx) => {
                if self.tabs.select_tab(idx) {
                    self.sync_results();
                    self.focus = PanelFocus::Editor;
                } else {
                    self.set_status(format!("No tab {}", idx + 1), StatusLevel::Warning);
                }
                Action::None
            }
            Command::Exec => self.execute_query(),
            Command::Discard => {
                self.discard_query();
                Action::None
            }
            Command::Format => {
                self.format_query();
                Action::None
            }
            Command::Refresh => self.refresh_databases(),
            Command::Help => {
                self.show_help();
                Action::None
            }
            Command::Quit => Action::Quit,
        }
    }

    // ── Tabs ─────────────────────────────────────────────────

    /// Open (or re-select) the tab for `data` and focus the editor
    pub fn open_tab(&mut self, data: &TabData) {
        match self.tabs.on_tab_data(data) {
            Some(TabOpen::Opened(_)) => {
                self.set_status(
                    format!("Opened {}.{}", data.db_name, data.table_name),
                    StatusLevel::Info,
                );
                self.focus = PanelFocus::Editor;
            }
            Some(TabOpen::Reselected(_)) => {
                self.focus = PanelFocus::Editor;
            }
            Some(TabOpen::LimitReached) => {
                self.set_status(
                    format!("Maximum {} tabs open", self.tabs.max_tabs()),
                    StatusLevel::Warning,
                );
            }
            None => {
                self.set_status(
                    "Both database and table name are required".to_string(),
                    StatusLevel::Warning,
                );
            }
        }
        self.sync_results();
    }

    /// Close the selected tab, or the tab at `idx`. A query still running in
    /// the closed tab is cancelled.
    fn close_tab(&mut self, idx: Option<usize>) -> Action {
        let closed = match idx {
            Some(i) => self.tabs.close_tab(i),
            None => self.tabs.close_selected(),
        };
        let Some(closed) = closed else {
            let message = match idx {
                Some(i) => format!("No tab {}", i + 1),
                None => "No tab to close".to_string(),
            };
            self.set_status(message, StatusLevel::Warning);
            return Action::None;
        };

        let was_running = self.results.is_running(&closed.id);
        self.results.remove(&closed.id);
        self.sync_results();
        if self.tabs.is_empty() && self.focus == PanelFocus::Editor {
            self.focus = PanelFocus::Browser;
        }
        self.set_status(format!("Closed {}", closed.id), StatusLevel::Info);

        if was_running {
            Action::CancelQuery { tab_id: closed.id }
        } else {
            Action::None
        }
    }

    /// Point the results grid at the selected tab
    fn sync_results(&mut self) {
        let current = self.tabs.selected_tab().map(|t| t.id.clone());
        self.results.bind(current.as_deref());
    }

    // ── Queries ──────────────────────────────────────────────

    fn execute_query(&mut self) -> Action {
        let Some(tab_id) = self.tabs.selected_tab().map(|t| t.id.clone()) else {
            self.set_status("No tab open".to_string(), StatusLevel::Warning);
            return Action::None;
        };
        if self.results.is_running(&tab_id) {
            self.set_status(
                "A query is already running in this tab".to_string(),
                StatusLevel::Warning,
            );
            return Action::None;
        }
        if self.tabs.selected_content().is_none_or(|sql| sql.trim().is_empty()) {
            self.set_status("Nothing to execute".to_string(), StatusLevel::Warning);
            return Action::None;
        }

        self.tabs.handle_exec_query_click();
        let Some(request) = self.tabs.execution_request(self.next_run_id) else {
            return Action::None;
        };
        self.next_run_id += 1;
        self.results.start(&request);
        self.set_status(
            format!("Executing query on {}...", request.database),
            StatusLevel::Info,
        );
        Action::ExecuteQuery(request)
    }

    fn discard_query(&mut self) {
        if self.tabs.on_disc_query_click() {
            self.set_status("Query discarded".to_string(), StatusLevel::Info);
        }
    }

    fn format_query(&mut self) {
        let Some(sql) = self.tabs.selected_content() else {
            return;
        };
        if sql.trim().is_empty() {
            return;
        }
        let formatted = sqlformat::format(
            sql,
            &sqlformat::QueryParams::None,
            &sqlformat::FormatOptions {
                indent: sqlformat::Indent::Spaces(2),
                uppercase: Some(true),
                lines_between_queries: 1,
                ..Default::default()
            },
        );
        self.tabs.replace_content(formatted);
        self.set_status("Query formatted".to_string(), StatusLevel::Info);
    }

    fn cancel_query(&mut self) -> Action {
        let Some(tab_id) = self.tabs.selected_tab().map(|t| t.id.clone()) else {
            return Action::None;
        };
        if self.results.cancel(&tab_id).is_none() {
            return Action::None;
        }
        self.set_status("Query cancelled".to_string(), StatusLevel::Warning);
        Action::CancelQuery { tab_id }
    }

    fn refresh_databases(&mut self) -> Action {
        self.browser.set_loading();
        self.set_status("Loading databases...".to_string(), StatusLevel::Info);
        Action::LoadDatabases
    }

    // ── View lifecycle ───────────────────────────────────────

    /// Post-render hook. Creates the editor once its area is on screen and a
    /// tab is selected. Returns true if the editor appeared, so the caller
    /// can draw again.
    pub fn after_render(&mut self, editor_area: Rect) -> bool {
        let had_editor = self.tabs.has_editor();
        let mounted = !self.tabs.is_empty() && editor_area.width > 2 && editor_area.height > 2;
        if !self.view_initialized {
            self.view_initialized = true;
            self.tabs.after_view_init(mounted);
        }
        self.tabs.after_view_checked(mounted);
        !had_editor && self.tabs.has_editor()
    }

    // ── Focus & status ───────────────────────────────────────

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Browser => PanelFocus::Editor,
            PanelFocus::Editor => PanelFocus::Results,
            PanelFocus::Results => PanelFocus::Browser,
            other => other,
        };
    }

    fn cycle_focus_reverse(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Browser => PanelFocus::Results,
            PanelFocus::Editor => PanelFocus::Browser,
            PanelFocus::Results => PanelFocus::Editor,
            other => other,
        };
    }

    fn open_command_bar(&mut self) {
        if self.focus != PanelFocus::Help {
            self.previous_focus = self.focus;
        }
        self.help.hide();
        self.focus = PanelFocus::CommandBar;
        self.command_bar.activate();
    }

    fn show_help(&mut self) {
        self.previous_focus = self.focus;
        self.focus = PanelFocus::Help;
        self.help.show();
    }

    pub fn set_status(&mut self, message: String, level: StatusLevel) {
        self.status_message = Some(StatusMessage { message, level });
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(text) {
                Ok(()) => self.set_status("Copied to clipboard".to_string(), StatusLevel::Success),
                Err(e) => {
                    self.set_status(format!("Clipboard error: {}", e), StatusLevel::Warning);
                }
            }
        } else {
            let reason = self.clipboard_error.as_deref().unwrap_or("unknown reason");
            self.set_status(
                format!("Clipboard unavailable: {}", reason),
                StatusLevel::Warning,
            );
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
