//! Tab strip above the editor
//!
//! Labels are the tab ids (`db.table`). When the tabs do not fit, the strip
//! shows a window around the selected tab with `‹`/`›` markers for the rest,
//! so a newly opened tab is always scrolled into view.

use crate::tabs::TabInfo;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const SEPARATOR: &str = "│";
const RUNNING_MARK: &str = " ⟳";

/// Display label for a tab
pub fn tab_label(tab: &TabInfo, running: bool) -> String {
    if running {
        format!(" {}{} ", tab.id, RUNNING_MARK)
    } else {
        format!(" {} ", tab.id)
    }
}

/// Range of tabs to draw so that `selected` is visible.
///
/// `widths` are label widths; one separator cell sits between labels. When
/// not everything fits, two cells are reserved for the overflow markers.
pub fn visible_window(widths: &[usize], selected: usize, available: usize) -> (usize, usize) {
    if widths.is_empty() {
        return (0, 0);
    }
    let selected = selected.min(widths.len() - 1);
    let span = |start: usize, end: usize| -> usize {
        widths[start..end].iter().sum::<usize>() + (end - start).saturating_sub(1)
    };

    if span(0, widths.len()) <= available {
        return (0, widths.len());
    }

    let budget = available.saturating_sub(2);
    let mut start = 0;
    while start < selected && span(start, selected + 1) > budget {
        start += 1;
    }
    let mut end = selected + 1;
    while end < widths.len() && span(start, end + 1) <= budget {
        end += 1;
    }
    (start, end)
}

/// Render the tab strip
pub fn render_tab_bar(
    frame: &mut Frame,
    area: Rect,
    tabs: &[TabInfo],
    selected: Option<usize>,
    is_running: impl Fn(&str) -> bool,
    theme: &Theme,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    if tabs.is_empty() {
        frame.render_widget(
            Paragraph::new(" No tabs open. Select a table in the browser or use /open db.table")
                .style(theme.tab_overflow),
            area,
        );
        return;
    }

    let labels: Vec<String> = tabs
        .iter()
        .map(|t| tab_label(t, is_running(&t.id)))
        .collect();
    let widths: Vec<usize> = labels.iter().map(|l| l.width()).collect();
    let (start, end) = visible_window(&widths, selected.unwrap_or(0), area.width as usize);

    let mut spans = Vec::new();
    if start > 0 {
        spans.push(Span::styled("‹", theme.tab_overflow));
    }
    for (idx, label) in labels.iter().enumerate().take(end).skip(start) {
        if idx > start {
            spans.push(Span::styled(SEPARATOR, theme.tab_overflow));
        }
        let style = if Some(idx) == selected {
            theme.tab_active
        } else {
            theme.tab_inactive
        };
        spans.push(Span::styled(label.as_str(), style));
    }
    if end < tabs.len() {
        spans.push(Span::styled("›", theme.tab_overflow));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
