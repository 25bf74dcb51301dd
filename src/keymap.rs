//! Data-driven keybinding configuration
//!
//! All keybindings are defined as data in `KeyMap::default()`, not as match arms
//! scattered across components. To add a new binding, add an entry to the
//! appropriate context in `KeyMap::default()` and handle the `KeyAction` in
//! `App::execute_key_action()`.

use crate::app::PanelFocus;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// A key combination (code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

impl From<KeyEvent> for KeyBind {
    fn from(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Semantic key actions: what a key means, not what key it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Global
    Quit,
    OpenCommandBar,
    CycleFocus,
    CycleFocusReverse,
    ShowHelp,
    CloseTab,
    NextTab,
    PrevTab,

    // Navigation (shared by browser, results, help)
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Home,
    End,

    // Editor-specific
    ExecuteQuery,
    DiscardQuery,
    FormatQuery,
    CancelQuery,

    // Results-specific
    CopyCell,
    CopyRow,

    // Browser-specific
    ToggleExpand,
    Activate,
    Collapse,
    RefreshDatabases,

    // Modal dismiss/submit
    Dismiss,
    Submit,
}

/// Keybinding configuration: maps key combos to semantic actions per context.
pub struct KeyMap {
    /// Bindings that apply regardless of focus (checked first)
    global: HashMap<KeyBind, KeyAction>,
    /// Per-panel bindings (checked after global)
    panels: HashMap<PanelFocus, HashMap<KeyBind, KeyAction>>,
}

impl KeyMap {
    /// Resolve a key event to a semantic action.
    /// Checks global bindings first, then panel-specific bindings.
    pub fn resolve(&self, focus: PanelFocus, key: KeyEvent) -> Option<KeyAction> {
        let bind = KeyBind::from(key);
        if let Some(action) = self.global.get(&bind) {
            return Some(*action);
        }
        self.panels
            .get(&focus)
            .and_then(|m| m.get(&bind))
            .copied()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        let global = HashMap::from([
            (KeyBind::ctrl('q'), KeyAction::Quit),
            (KeyBind::ctrl('p'), KeyAction::OpenCommandBar),
            (KeyBind::plain(KeyCode::Tab), KeyAction::CycleFocus),
            (
                KeyBind::new(KeyCode::BackTab, KeyModifiers::SHIFT),
                KeyAction::CycleFocusReverse,
            ),
            (KeyBind::plain(KeyCode::F(1)), KeyAction::ShowHelp),
            (KeyBind::ctrl('w'), KeyAction::CloseTab),
            (KeyBind::ctrl('n'), KeyAction::NextTab),
            (KeyBind::ctrl('b'), KeyAction::PrevTab),
        ]);

        let mut panels = HashMap::new();

        // ── Editor ───────────────────────────────────────────────
        let editor = HashMap::from([
            (KeyBind::plain(KeyCode::F(5)), KeyAction::ExecuteQuery),
            (
                KeyBind::new(KeyCode::Enter, KeyModifiers::CONTROL),
                KeyAction::ExecuteQuery,
            ),
            (KeyBind::ctrl('l'), KeyAction::DiscardQuery),
            (
                KeyBind::new(KeyCode::Char('f'), KeyModifiers::CONTROL | KeyModifiers::ALT),
                KeyAction::FormatQuery,
            ),
            (KeyBind::plain(KeyCode::Esc), KeyAction::CancelQuery),
        ]);
        panels.insert(PanelFocus::Editor, editor);

        // ── Results ──────────────────────────────────────────────
        let mut results = HashMap::new();
        insert_vim_nav(&mut results);
        results.insert(KeyBind::plain(KeyCode::Char('y')), KeyAction::CopyCell);
        results.insert(
            KeyBind::new(KeyCode::Char('Y'), KeyModifiers::SHIFT),
            KeyAction::CopyRow,
        );
        results.insert(KeyBind::plain(KeyCode::Esc), KeyAction::CancelQuery);
        panels.insert(PanelFocus::Results, results);

        // ── Browser ──────────────────────────────────────────────
        let browser = HashMap::from([
            (KeyBind::plain(KeyCode::Down), KeyAction::MoveDown),
            (KeyBind::plain(KeyCode::Char('j')), KeyAction::MoveDown),
            (KeyBind::plain(KeyCode::Up), KeyAction::MoveUp),
            (KeyBind::plain(KeyCode::Char('k')), KeyAction::MoveUp),
            (KeyBind::plain(KeyCode::Enter), KeyAction::Activate),
            (KeyBind::plain(KeyCode::Char('h')), KeyAction::Collapse),
            (KeyBind::plain(KeyCode::Left), KeyAction::Collapse),
            (KeyBind::plain(KeyCode::Char(' ')), KeyAction::ToggleExpand),
            (KeyBind::plain(KeyCode::Char('r')), KeyAction::RefreshDatabases),
        ]);
        panels.insert(PanelFocus::Browser, browser);

        // ── Help ─────────────────────────────────────────────────
        let mut help = HashMap::from([
            (KeyBind::plain(KeyCode::Esc), KeyAction::Dismiss),
            (KeyBind::plain(KeyCode::Char('q')), KeyAction::Dismiss),
        ]);
        insert_scroll_nav(&mut help);
        panels.insert(PanelFocus::Help, help);

        // ── Command bar ──────────────────────────────────────────
        let command_bar = HashMap::from([
            (KeyBind::plain(KeyCode::Enter), KeyAction::Submit),
            (KeyBind::plain(KeyCode::Esc), KeyAction::Dismiss),
        ]);
        panels.insert(PanelFocus::CommandBar, command_bar);

        Self { global, panels }
    }
}

/// Insert vim-style navigation bindings (arrows + hjkl + page + g/G + Home/End)
fn insert_vim_nav(map: &mut HashMap<KeyBind, KeyAction>) {
    insert_scroll_nav(map);
    map.extend([
        (KeyBind::plain(KeyCode::Right), KeyAction::MoveRight),
        (KeyBind::plain(KeyCode::Char('l')), KeyAction::MoveRight),
        (KeyBind::plain(KeyCode::Left), KeyAction::MoveLeft),
        (KeyBind::plain(KeyCode::Char('h')), KeyAction::MoveLeft),
        (KeyBind::plain(KeyCode::Home), KeyAction::Home),
        (KeyBind::plain(KeyCode::End), KeyAction::End),
    ]);
}

/// Insert vertical navigation bindings (arrows + jk + page + g/G)
fn insert_scroll_nav(map: &mut HashMap<KeyBind, KeyAction>) {
    map.extend([
        (KeyBind::plain(KeyCode::Down), KeyAction::MoveDown),
        (KeyBind::plain(KeyCode::Char('j')), KeyAction::MoveDown),
        (KeyBind::plain(KeyCode::Up), KeyAction::MoveUp),
        (KeyBind::plain(KeyCode::Char('k')), KeyAction::MoveUp),
        (KeyBind::plain(KeyCode::PageDown), KeyAction::PageDown),
        (KeyBind::plain(KeyCode::PageUp), KeyAction::PageUp),
        (KeyBind::plain(KeyCode::Char('g')), KeyAction::GoToTop),
        (
            KeyBind::new(KeyCode::Char('G'), KeyModifiers::SHIFT),
            KeyAction::GoToBottom,
        ),
        (KeyBind::plain(KeyCode::Home), KeyAction::GoToTop),
        (KeyBind::plain(KeyCode::End), KeyAction::GoToBottom),
    ]);
}
