use crate::common::{test_databases, test_results};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use sqltabs::app::{App, AppEvent};
use sqltabs::tabs::{ExecutionRequest, TabData};
use sqltabs::ui::render::render;

fn draw(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    let mut layout = None;
    terminal
        .draw(|frame| layout = Some(render(frame, app)))
        .unwrap();
    if app.after_render(layout.unwrap().editor) {
        terminal
            .draw(|frame| {
                render(frame, app);
            })
            .unwrap();
    }
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_empty_app_shows_placeholders() {
    let mut app = App::new();
    let screen = draw(&mut app);
    assert!(screen.contains("Databases"));
    assert!(screen.contains("No databases"));
    assert!(screen.contains("Select a table to open a query tab."));
    assert!(screen.contains("[http://localhost:3000/api]"));
}

#[test]
fn test_database_tree_renders() {
    let mut app = App::new();
    app.handle_event(AppEvent::DatabasesLoaded(test_databases()))
        .unwrap();
    app.browser.toggle_expand();
    let screen = draw(&mut app);
    assert!(screen.contains("shop"));
    assert!(screen.contains("orders"));
    assert!(screen.contains("users"));
    assert!(screen.contains("analytics"));
}

#[test]
fn test_tabs_and_editor_render() {
    let mut app = App::new();
    app.open_tab(&TabData::new("shop", "users"));
    app.open_tab(&TabData::new("shop", "orders"));
    let screen = draw(&mut app);
    assert!(screen.contains(" shop.users "));
    assert!(screen.contains(" shop.orders "));
    assert!(screen.contains("Query: shop.orders"));
    assert!(screen.contains("SELECT * FROM shop.orders;"));
}

#[test]
fn test_results_render_for_selected_tab() {
    let mut app = App::new();
    app.open_tab(&TabData::new("shop", "users"));
    draw(&mut app);

    app.results.start(&ExecutionRequest {
        run_id: 1,
        tab_id: "shop.users".to_string(),
        database: "shop".to_string(),
        sql: "SELECT * FROM shop.users;".to_string(),
    });
    let running = draw(&mut app);
    assert!(running.contains("shop.users ⟳"));

    app.handle_event(AppEvent::QueryCompleted {
        tab_id: "shop.users".to_string(),
        run_id: 1,
        results: test_results(),
    })
    .unwrap();
    let screen = draw(&mut app);
    assert!(screen.contains("Alice"));
    assert!(screen.contains("NULL"));
    assert!(screen.contains("Row 1/2"));
}

#[test]
fn test_help_overlay_renders() {
    let mut app = App::new();
    app.help.show();
    let screen = draw(&mut app);
    assert!(screen.contains("Help (Esc to close)"));
    assert!(screen.contains("/open"));
}
