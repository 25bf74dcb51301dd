//! Query results grid
//!
//! Keeps one view per tab, keyed by tab id. The grid is bound to the current
//! tab; completions for other tabs are stored and shown when those tabs are
//! selected again. Views of closed tabs are dropped. Each execution carries
//! a run id; an outcome is only accepted by the view still running that run,
//! so late results of cancelled or replaced runs are ignored.

use crate::backend::{CellValue, QueryResults};
use crate::tabs::ExecutionRequest;
use crate::ui::Component;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use std::collections::HashMap;
use unicode_truncate::{Alignment, UnicodeTruncateStr};
use unicode_width::UnicodeWidthStr;

const PAGE_SIZE: usize = 20;

/// Execution state of one tab's view
#[derive(Debug, Clone)]
pub enum ViewState {
    Running,
    Done(QueryResults),
    Failed(String),
}

/// Results of one tab
#[derive(Debug, Clone)]
pub struct TabView {
    pub run_id: u64,
    pub database: String,
    pub sql: String,
    pub state: ViewState,
    selected_row: usize,
    selected_col: usize,
    h_scroll_offset: usize,
    col_widths: Vec<u16>,
}

impl TabView {
    fn new(request: &ExecutionRequest) -> Self {
        Self {
            run_id: request.run_id,
            database: request.database.clone(),
            sql: request.sql.clone(),
            state: ViewState::Running,
            selected_row: 0,
            selected_col: 0,
            h_scroll_offset: 0,
            col_widths: Vec::new(),
        }
    }

    fn results(&self) -> Option<&QueryResults> {
        match &self.state {
            ViewState::Done(r) => Some(r),
            _ => None,
        }
    }

    fn row_count(&self) -> usize {
        self.results().map_or(0, |r| r.rows.len())
    }

    fn col_count(&self) -> usize {
        self.results().map_or(0, |r| r.columns.len())
    }
}

/// Results panel
#[derive(Default)]
pub struct ResultsGrid {
    views: HashMap<String, TabView>,
    /// Tab whose view is displayed
    current: Option<String>,
}

impl ResultsGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execution triggered: the tab's view shows a running query
    pub fn start(&mut self, request: &ExecutionRequest) {
        self.views
            .insert(request.tab_id.clone(), TabView::new(request));
    }

    /// The view of `tab_id` if it is still running `run_id`
    fn running_view_mut(&mut self, tab_id: &str, run_id: u64) -> Option<&mut TabView> {
        match self.views.get_mut(tab_id) {
            Some(view) if view.run_id == run_id && matches!(view.state, ViewState::Running) => {
                Some(view)
            }
            _ => {
                tracing::debug!(tab = tab_id, run_id, "dropping outcome of stale run");
                None
            }
        }
    }

    /// Store results of run `run_id` for `tab_id`. Returns false if the tab
    /// was closed, or the run was cancelled or superseded.
    pub fn complete(&mut self, tab_id: &str, run_id: u64, results: QueryResults) -> bool {
        let Some(view) = self.running_view_mut(tab_id, run_id) else {
            return false;
        };
        view.col_widths = compute_column_widths(&results);
        view.state = ViewState::Done(results);
        view.selected_row = 0;
        view.selected_col = 0;
        view.h_scroll_offset = 0;
        true
    }

    /// Store the error of run `run_id` for `tab_id`. Same acceptance rule
    /// as [`complete`](Self::complete).
    pub fn fail(&mut self, tab_id: &str, run_id: u64, error: String) -> bool {
        let Some(view) = self.running_view_mut(tab_id, run_id) else {
            return false;
        };
        view.state = ViewState::Failed(error);
        view.col_widths.clear();
        true
    }

    /// Stop waiting for the running query of `tab_id`. Returns the run id
    /// that was cancelled, if one was running.
    pub fn cancel(&mut self, tab_id: &str) -> Option<u64> {
        let view = self.views.get_mut(tab_id)?;
        if !matches!(view.state, ViewState::Running) {
            return None;
        }
        view.state = ViewState::Failed("Query cancelled".to_string());
        view.col_widths.clear();
        Some(view.run_id)
    }

    /// Display the view of `tab_id` (or nothing)
    pub fn bind(&mut self, tab_id: Option<&str>) {
        self.current = tab_id.map(String::from);
    }

    /// Forget a closed tab
    pub fn remove(&mut self, tab_id: &str) {
        self.views.remove(tab_id);
        if self.current.as_deref() == Some(tab_id) {
            self.current = None;
        }
    }

    pub fn is_running(&self, tab_id: &str) -> bool {
        matches!(
            self.views.get(tab_id).map(|v| &v.state),
            Some(ViewState::Running)
        )
    }

    pub fn bound_tab(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn view(&self, tab_id: &str) -> Option<&TabView> {
        self.views.get(tab_id)
    }

    fn current_view(&self) -> Option<&TabView> {
        self.current.as_deref().and_then(|id| self.views.get(id))
    }

    fn current_view_mut(&mut self) -> Option<&mut TabView> {
        let id = self.current.as_deref()?;
        self.views.get_mut(id)
    }

    /// Results of the displayed tab
    pub fn results(&self) -> Option<&QueryResults> {
        self.current_view().and_then(TabView::results)
    }

    /// Selected (row, column) of the displayed tab
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.current_view()
            .map(|v| (v.selected_row, v.selected_col))
    }

    /// Get text of the selected cell
    pub fn selected_cell_text(&self) -> Option<String> {
        let view = self.current_view()?;
        let row = view.results()?.rows.get(view.selected_row)?;
        let cell = row.values.get(view.selected_col)?;
        Some(match cell {
            CellValue::Json(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
            other => other.display_string(usize::MAX),
        })
    }

    /// Get tab-separated values of the selected row
    pub fn selected_row_text(&self) -> Option<String> {
        let view = self.current_view()?;
        let row = view.results()?.rows.get(view.selected_row)?;
        let parts: Vec<String> = row
            .values
            .iter()
            .map(|v| v.display_string(usize::MAX))
            .collect();
        Some(parts.join("\t"))
    }

    // ── Navigation ───────────────────────────────────────────

    pub fn move_up(&mut self) {
        if let Some(v) = self.current_view_mut() {
            v.selected_row = v.selected_row.saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if let Some(v) = self.current_view_mut()
            && v.selected_row + 1 < v.row_count()
        {
            v.selected_row += 1;
        }
    }

    pub fn move_left(&mut self) {
        if let Some(v) = self.current_view_mut() {
            v.selected_col = v.selected_col.saturating_sub(1);
            v.h_scroll_offset = v.h_scroll_offset.min(v.selected_col);
        }
    }

    pub fn move_right(&mut self) {
        if let Some(v) = self.current_view_mut()
            && v.selected_col + 1 < v.col_count()
        {
            v.selected_col += 1;
        }
    }

    pub fn page_up(&mut self) {
        if let Some(v) = self.current_view_mut() {
            v.selected_row = v.selected_row.saturating_sub(PAGE_SIZE);
        }
    }

    pub fn page_down(&mut self) {
        if let Some(v) = self.current_view_mut() {
            v.selected_row = (v.selected_row + PAGE_SIZE).min(v.row_count().saturating_sub(1));
        }
    }

    pub fn go_to_top(&mut self) {
        if let Some(v) = self.current_view_mut() {
            v.selected_row = 0;
        }
    }

    pub fn go_to_bottom(&mut self) {
        if let Some(v) = self.current_view_mut() {
            v.selected_row = v.row_count().saturating_sub(1);
        }
    }

    pub fn go_to_home(&mut self) {
        if let Some(v) = self.current_view_mut() {
            v.selected_col = 0;
            v.h_scroll_offset = 0;
        }
    }

    pub fn go_to_end(&mut self) {
        if let Some(v) = self.current_view_mut() {
            v.selected_col = v.col_count().saturating_sub(1);
        }
    }
}

impl Component for ResultsGrid {
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let Some(view) = self.current_view() else {
            let msg = if self.current.is_some() {
                "No results yet. Press F5 to execute the query."
            } else {
                "Open a table to start querying."
            };
            frame.render_widget(Paragraph::new(msg).style(theme.results_empty), area);
            return;
        };

        let results = match &view.state {
            ViewState::Running => {
                let msg = format!("Running query on {}...", view.database);
                frame.render_widget(Paragraph::new(msg).style(theme.results_running), area);
                return;
            }
            ViewState::Failed(error) => {
                let lines = vec![
                    Line::from(Span::styled("Query Error", theme.results_error_title)),
                    Line::from(""),
                    Line::from(Span::styled(error.as_str(), theme.results_error_text)),
                ];
                frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
                return;
            }
            ViewState::Done(results) => results,
        };

        if let Some(affected) = results.affected_rows {
            let msg = format!(
                "{} row{} affected in {:.1}ms ({})",
                affected,
                if affected == 1 { "" } else { "s" },
                results.execution_time.as_secs_f64() * 1000.0,
                results.executed_at.format("%H:%M:%S"),
            );
            frame.render_widget(Paragraph::new(msg).style(theme.results_footer), area);
            return;
        }

        if results.columns.is_empty() {
            frame.render_widget(
                Paragraph::new("Query returned no rows").style(theme.results_empty),
                area,
            );
            return;
        }

        if area.height < 2 || area.width < 5 {
            return;
        }

        let visible_height = (area.height as usize).saturating_sub(2); // header + footer
        let scroll_offset = view
            .selected_row
            .saturating_sub(visible_height.saturating_sub(1));
        let col_widths = &view.col_widths;
        let h_scroll = horizontal_offset(col_widths, view.selected_col, view.h_scroll_offset, area.width);

        // Header row
        let mut x = area.x;
        for (col_idx, name) in results.columns.iter().enumerate().skip(h_scroll) {
            if x >= area.right() {
                break;
            }
            let w = col_widths
                .get(col_idx)
                .copied()
                .unwrap_or(10)
                .min(area.right() - x);
            let style = if focused && col_idx == view.selected_col {
                theme.results_header_selected
            } else {
                theme.results_header
            };
            frame.render_widget(
                Paragraph::new(fit(name, w)).style(style),
                Rect::new(x, area.y, w, 1),
            );
            x += w + 1;
        }

        // Rows
        for vis_row in 0..visible_height {
            let row_idx = scroll_offset + vis_row;
            let Some(row) = results.rows.get(row_idx) else {
                break;
            };
            let y = area.y + 1 + vis_row as u16;
            let row_base_style = if vis_row % 2 == 0 {
                theme.results_row_even
            } else {
                theme.results_row_odd
            };

            let mut x = area.x;
            for (col_idx, cell) in row.values.iter().enumerate().skip(h_scroll) {
                if x >= area.right() {
                    break;
                }
                let w = col_widths
                    .get(col_idx)
                    .copied()
                    .unwrap_or(10)
                    .min(area.right() - x);
                let style = if focused && row_idx == view.selected_row && col_idx == view.selected_col {
                    theme.results_selected
                } else if cell.is_null() {
                    theme.results_null
                } else {
                    row_base_style
                };
                let text = cell.display_string(w as usize);
                frame.render_widget(Paragraph::new(fit(&text, w)).style(style), Rect::new(x, y, w, 1));
                x += w + 1;
            }
        }

        // Footer
        let footer = format!(
            "Row {}/{} | Col {}/{} | {:.1}ms | {} | {}",
            view.selected_row + 1,
            results.row_count,
            view.selected_col + 1,
            results.columns.len(),
            results.execution_time.as_secs_f64() * 1000.0,
            results.executed_at.format("%H:%M:%S"),
            view.database,
        );
        frame.render_widget(
            Paragraph::new(footer).style(theme.results_footer),
            Rect::new(area.x, area.bottom() - 1, area.width, 1),
        );
    }
}

/// Truncate and pad `text` to exactly `width` display cells
fn fit(text: &str, width: u16) -> String {
    text.unicode_pad(width as usize, Alignment::Left, true)
        .into_owned()
}

/// First column to draw so that `selected` fits within `width` cells
fn horizontal_offset(col_widths: &[u16], selected: usize, current: usize, width: u16) -> usize {
    if selected < current {
        return selected;
    }
    let w = |i: usize| col_widths.get(i).copied().unwrap_or(10);

    let mut x: u16 = 0;
    for ci in current..=selected {
        let cw = w(ci);
        if ci == selected {
            if x.saturating_add(cw) <= width {
                return current;
            }
            break;
        }
        x = x.saturating_add(cw + 1);
    }

    let mut start = selected;
    let mut total = w(selected);
    while start > 0 {
        let prev = w(start - 1);
        if total + prev + 1 > width {
            break;
        }
        total += prev + 1;
        start -= 1;
    }
    start
}

/// Compute column widths from header names and the first 100 rows
fn compute_column_widths(results: &QueryResults) -> Vec<u16> {
    let mut widths: Vec<u16> = results
        .columns
        .iter()
        .map(|c| c.width() as u16 + 1)
        .collect();

    for row in results.rows.iter().take(100) {
        for (i, cell) in row.values.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                let cell_width = cell.display_string(50).width() as u16 + 1;
                *w = (*w).max(cell_width);
            }
        }
    }

    for w in &mut widths {
        *w = (*w).clamp(4, 40);
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Row;
    use std::time::Duration;

    fn request(tab_id: &str) -> ExecutionRequest {
        run(tab_id, 1)
    }

    fn run(tab_id: &str, run_id: u64) -> ExecutionRequest {
        let (db, _) = tab_id.split_once('.').unwrap();
        ExecutionRequest {
            run_id,
            tab_id: tab_id.to_string(),
            database: db.to_string(),
            sql: format!("SELECT * FROM {};", tab_id),
        }
    }

    fn sample_results() -> QueryResults {
        QueryResults::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                Row {
                    values: vec![CellValue::Integer(1), CellValue::Text("Alice".to_string())],
                },
                Row {
                    values: vec![CellValue::Integer(2), CellValue::Null],
                },
            ],
            Duration::from_millis(42),
        )
    }

    fn bound_with_results() -> ResultsGrid {
        let mut grid = ResultsGrid::new();
        grid.start(&request("shop.users"));
        grid.bind(Some("shop.users"));
        grid.complete("shop.users", 1, sample_results());
        grid
    }

    #[test]
    fn test_start_marks_running() {
        let mut grid = ResultsGrid::new();
        grid.start(&request("shop.users"));
        assert!(grid.is_running("shop.users"));
        assert!(!grid.is_running("shop.orders"));
        assert_eq!(grid.view("shop.users").unwrap().database, "shop");
    }

    #[test]
    fn test_complete_routes_by_tab_id() {
        let mut grid = ResultsGrid::new();
        grid.start(&request("shop.users"));
        grid.start(&request("shop.orders"));
        grid.bind(Some("shop.orders"));

        assert!(grid.complete("shop.users", 1, sample_results()));
        assert!(grid.results().is_none());
        assert!(grid.is_running("shop.orders"));

        grid.bind(Some("shop.users"));
        assert_eq!(grid.results().unwrap().row_count, 2);
    }

    #[test]
    fn test_results_for_closed_tab_are_dropped() {
        let mut grid = ResultsGrid::new();
        grid.start(&request("shop.users"));
        grid.remove("shop.users");
        assert!(!grid.complete("shop.users", 1, sample_results()));
        assert!(!grid.fail("shop.users", 1, "boom".to_string()));
        assert!(grid.view("shop.users").is_none());
    }

    #[test]
    fn test_outcome_of_superseded_run_is_dropped() {
        let mut grid = ResultsGrid::new();
        grid.bind(Some("shop.users"));
        grid.start(&run("shop.users", 1));
        assert_eq!(grid.cancel("shop.users"), Some(1));
        grid.start(&run("shop.users", 2));

        assert!(!grid.complete("shop.users", 1, sample_results()));
        assert!(!grid.fail("shop.users", 1, "late".to_string()));
        assert!(grid.is_running("shop.users"));

        assert!(grid.complete("shop.users", 2, sample_results()));
        assert_eq!(grid.results().unwrap().row_count, 2);
    }

    #[test]
    fn test_cancel_only_affects_running_view() {
        let mut grid = bound_with_results();
        assert_eq!(grid.cancel("shop.users"), None);
        assert!(grid.results().is_some());
        assert_eq!(grid.cancel("shop.orders"), None);

        grid.start(&run("shop.users", 2));
        assert_eq!(grid.cancel("shop.users"), Some(2));
        assert!(!grid.is_running("shop.users"));
        assert!(matches!(
            grid.view("shop.users").unwrap().state,
            ViewState::Failed(ref msg) if msg == "Query cancelled"
        ));
        // Nothing is running anymore, so the cancelled run cannot complete
        assert!(!grid.complete("shop.users", 2, sample_results()));
    }

    #[test]
    fn test_remove_unbinds_current() {
        let mut grid = bound_with_results();
        grid.remove("shop.users");
        assert_eq!(grid.bound_tab(), None);
    }

    #[test]
    fn test_fail_replaces_results() {
        let mut grid = bound_with_results();
        grid.start(&run("shop.users", 2));
        assert!(grid.fail("shop.users", 2, "Table 'shop.users' doesn't exist".to_string()));
        assert!(grid.results().is_none());
        assert!(matches!(
            grid.view("shop.users").unwrap().state,
            ViewState::Failed(_)
        ));
    }

    #[test]
    fn test_restart_resets_selection() {
        let mut grid = bound_with_results();
        grid.move_down();
        grid.start(&run("shop.users", 2));
        grid.complete("shop.users", 2, sample_results());
        assert_eq!(grid.selection(), Some((0, 0)));
    }

    #[test]
    fn test_selected_cell_and_row_text() {
        let mut grid = bound_with_results();
        assert_eq!(grid.selected_cell_text(), Some("1".to_string()));
        grid.move_right();
        assert_eq!(grid.selected_cell_text(), Some("Alice".to_string()));
        grid.move_down();
        assert_eq!(grid.selected_row_text(), Some("2\tNULL".to_string()));
    }

    #[test]
    fn test_navigation_on_empty_grid() {
        let mut grid = ResultsGrid::new();
        grid.move_up();
        grid.move_down();
        grid.move_left();
        grid.move_right();
        grid.page_up();
        grid.page_down();
        grid.go_to_top();
        grid.go_to_bottom();
        grid.go_to_home();
        grid.go_to_end();
        assert_eq!(grid.selection(), None);
        assert_eq!(grid.selected_cell_text(), None);
    }

    #[test]
    fn test_navigation_boundary_clamping() {
        let mut grid = bound_with_results();
        grid.move_down();
        grid.move_down();
        grid.move_right();
        grid.move_right();
        assert_eq!(grid.selection(), Some((1, 1)));
        grid.go_to_top();
        grid.go_to_home();
        grid.move_up();
        grid.move_left();
        assert_eq!(grid.selection(), Some((0, 0)));
        grid.go_to_bottom();
        grid.go_to_end();
        assert_eq!(grid.selection(), Some((1, 1)));
        grid.page_up();
        assert_eq!(grid.selection(), Some((0, 1)));
    }

    #[test]
    fn test_column_widths_use_display_width() {
        let results = QueryResults::new(
            vec!["名前".to_string()],
            vec![Row {
                values: vec![CellValue::Text("日本語テキスト".to_string())],
            }],
            Duration::ZERO,
        );
        // 7 wide chars = 14 cells, +1 padding
        assert_eq!(compute_column_widths(&results), vec![15]);
    }

    #[test]
    fn test_column_widths_clamped() {
        let results = QueryResults::new(
            vec!["x".to_string()],
            vec![Row {
                values: vec![CellValue::Text("a".repeat(200))],
            }],
            Duration::ZERO,
        );
        assert_eq!(compute_column_widths(&results), vec![40]);
    }

    #[test]
    fn test_horizontal_offset() {
        let widths = [10, 10, 10, 10];
        assert_eq!(horizontal_offset(&widths, 0, 0, 25), 0);
        assert_eq!(horizontal_offset(&widths, 1, 0, 25), 0);
        // Column 2 ends at 32 > 25; scroll so columns 1..=2 show
        assert_eq!(horizontal_offset(&widths, 2, 0, 25), 1);
        assert_eq!(horizontal_offset(&widths, 0, 2, 25), 0);
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abcd");
    }

    fn render_to_string(grid: &ResultsGrid, width: u16, height: u16) -> String {
        use ratatui::{Terminal, backend::TestBackend};

        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| grid.render(f, f.area(), true, &Theme::default()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_table() {
        let grid = bound_with_results();
        let screen = render_to_string(&grid, 60, 5);
        assert!(screen.contains("id"));
        assert!(screen.contains("Alice"));
        assert!(screen.contains("NULL"));
        assert!(screen.contains("Row 1/2"));
    }

    #[test]
    fn test_render_running_and_error() {
        let mut grid = ResultsGrid::new();
        grid.start(&request("shop.users"));
        grid.bind(Some("shop.users"));
        assert!(render_to_string(&grid, 60, 3).contains("Running query on shop"));

        grid.fail("shop.users", 1, "Unknown column".to_string());
        let screen = render_to_string(&grid, 60, 3);
        assert!(screen.contains("Query Error"));
        assert!(screen.contains("Unknown column"));
    }

    #[test]
    fn test_render_affected_rows() {
        let mut grid = ResultsGrid::new();
        grid.start(&request("shop.users"));
        grid.bind(Some("shop.users"));
        grid.complete("shop.users", 1, QueryResults::affected(3, Duration::from_millis(5)));
        assert!(render_to_string(&grid, 60, 3).contains("3 rows affected"));
    }
}
