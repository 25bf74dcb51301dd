//! Top-level render function
//!
//! Orchestrates rendering of all panels using the layout module.

use crate::app::{App, PanelFocus, StatusLevel};
use crate::ui::Component;
use crate::ui::layout::{AppLayout, calculate_layout, centered_rect};
use crate::ui::tab_bar::render_tab_bar;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Render the entire application. Returns the layout so the caller can run
/// the post-render view checks against it.
pub fn render(frame: &mut Frame, app: &App) -> AppLayout {
    let theme = &app.theme;
    let layout = calculate_layout(frame.area(), app.browser_width);

    // Database browser
    let focused = app.focus == PanelFocus::Browser;
    let browser_block = Block::default()
        .borders(Borders::ALL)
        .title(" Databases ")
        .border_style(theme.border_style(focused));
    let browser_inner = browser_block.inner(layout.browser);
    frame.render_widget(browser_block, layout.browser);
    app.browser.render(frame, browser_inner, focused, theme);

    // Tab strip
    render_tab_bar(
        frame,
        layout.tab_bar,
        app.tabs.tabs(),
        app.tabs.selected_index(),
        |id| app.results.is_running(id),
        theme,
    );

    // Editor
    let focused = app.focus == PanelFocus::Editor;
    let title = match app.tabs.selected_tab() {
        Some(tab) => format!(" Query: {} ", tab.id),
        None => " Query ".to_string(),
    };
    let editor_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(theme.border_style(focused));
    let editor_inner = editor_block.inner(layout.editor);
    frame.render_widget(editor_block, layout.editor);
    match app.tabs.editor() {
        Some(editor) => editor.render(frame, editor_inner, focused, theme),
        None if app.tabs.is_empty() => frame.render_widget(
            Paragraph::new("Select a table to open a query tab.").style(theme.tree_placeholder),
            editor_inner,
        ),
        None => {}
    }

    // Results
    let focused = app.focus == PanelFocus::Results;
    let results_block = Block::default()
        .borders(Borders::ALL)
        .title(" Results ")
        .border_style(theme.border_style(focused));
    let results_inner = results_block.inner(layout.results);
    frame.render_widget(results_block, layout.results);
    app.results.render(frame, results_inner, focused, theme);

    // Command bar / status bar
    render_command_bar(frame, layout.command_bar, app, theme);

    // Help overlay on top of everything
    if app.help.is_visible() {
        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Help (Esc to close) ")
            .border_style(theme.border_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        app.help.render(frame, inner, theme);
    }

    layout
}

fn render_command_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    if app.command_bar.is_active() {
        app.command_bar.render(frame, area, true, theme);
        return;
    }

    let api_info = format!("[{}] ", app.api_url);
    let line = match app.status_message {
        Some(ref status) => {
            let style = match status.level {
                StatusLevel::Info => theme.status_info,
                StatusLevel::Success => theme.status_success,
                StatusLevel::Warning => theme.status_warning,
                StatusLevel::Error => theme.status_error,
            };
            Line::from(vec![
                Span::styled(api_info, theme.command_hint),
                Span::styled(status.message.as_str(), style),
            ])
        }
        None => Line::from(Span::styled(
            format!("{}Ctrl+P commands | F1 help | Ctrl+Q quit", api_info),
            theme.command_hint,
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
