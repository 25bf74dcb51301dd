//! Terminal UI components
//!
//! All UI widgets and rendering logic using ratatui.

pub mod command_bar;
pub mod editor;
pub mod help;
pub mod highlight;
pub mod layout;
pub mod render;
pub mod results;
pub mod tab_bar;
pub mod theme;
pub mod tree;

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::ui::theme::Theme;

/// What a component did with a key. Components never mutate siblings;
/// anything beyond their own state is decided by `App`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAction {
    /// Event consumed, no further action needed
    Consumed,
    /// Event not handled, parent should try
    Ignored,
}

/// Trait for UI components
pub trait Component {
    /// Handle a key event. Display-only components keep the default.
    fn handle_key(&mut self, _key: KeyEvent) -> ComponentAction {
        ComponentAction::Ignored
    }

    /// Render the component to the frame
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme);
}
