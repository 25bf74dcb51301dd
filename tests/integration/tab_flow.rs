//! End-to-end tab and query flows through App with an in-memory backend

use crate::common::{MockBackend, run_action, test_databases};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use sqltabs::app::{Action, App, AppEvent, PanelFocus};
use sqltabs::tabs::{EditorWidget, TabData};

fn editor_area() -> Rect {
    Rect::new(31, 2, 60, 20)
}

fn key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    app.handle_event(AppEvent::Key(KeyEvent::new(code, modifiers)))
        .unwrap()
}

fn press(app: &mut App, code: KeyCode) -> Action {
    key(app, code, KeyModifiers::NONE)
}

/// App with the database list loaded through the mock backend
fn loaded_app(backend: &MockBackend) -> App {
    let mut app = App::new();
    let action = press(&mut app, KeyCode::Char('r'));
    assert_eq!(action, Action::LoadDatabases);
    run_action(&mut app, backend, action);
    app.after_render(editor_area());
    app
}

#[test]
fn test_browse_open_execute() {
    let backend = MockBackend::default();
    let mut app = loaded_app(&backend);
    assert_eq!(app.browser.databases(), test_databases().as_slice());

    // shop ▶ expand, move to orders, open
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.tabs.current_tab_id(), "shop.orders");
    assert!(app.after_render(editor_area()));

    let action = press(&mut app, KeyCode::F(5));
    run_action(&mut app, &backend, action);

    assert_eq!(
        backend.executed(),
        vec![("shop".to_string(), "SELECT * FROM shop.orders;".to_string())]
    );
    let results = app.results.results().unwrap();
    assert_eq!(results.row_count, 2);
    assert_eq!(app.focus, PanelFocus::Results);
}

#[test]
fn test_each_tab_keeps_its_own_buffer_and_results() {
    let backend = MockBackend::default();
    let mut app = loaded_app(&backend);
    app.open_tab(&TabData::new("shop", "users"));
    app.after_render(editor_area());
    app.open_tab(&TabData::new("analytics", "events"));
    app.after_render(editor_area());

    // Edit the events tab and run it
    press(&mut app, KeyCode::End);
    press(&mut app, KeyCode::Backspace);
    for c in " LIMIT 5".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    let action = press(&mut app, KeyCode::F(5));
    run_action(&mut app, &backend, action);
    assert_eq!(
        backend.executed()[0],
        (
            "analytics".to_string(),
            "SELECT * FROM analytics.events LIMIT 5".to_string()
        )
    );

    // Back to users: its buffer and (empty) grid are untouched
    key(&mut app, KeyCode::Char('b'), KeyModifiers::CONTROL);
    assert_eq!(app.tabs.current_tab_id(), "shop.users");
    assert_eq!(
        app.tabs.editor().unwrap().value(),
        "SELECT * FROM shop.users;"
    );
    assert!(app.results.results().is_none());

    key(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
    assert_eq!(
        app.tabs.editor().unwrap().value(),
        "SELECT * FROM analytics.events LIMIT 5"
    );
    assert!(app.results.results().is_some());
}

#[test]
fn test_failed_query_is_shown_in_its_tab() {
    let backend = MockBackend::failing("Table 'shop.nope' doesn't exist");
    let mut app = loaded_app(&backend);
    app.open_tab(&TabData::new("shop", "nope"));
    app.after_render(editor_area());

    let action = press(&mut app, KeyCode::F(5));
    run_action(&mut app, &backend, action);

    assert!(!app.results.is_running("shop.nope"));
    assert!(app.results.results().is_none());
    assert!(
        app.status_message
            .as_ref()
            .unwrap()
            .message
            .contains("query failed")
    );
}

#[test]
fn test_closing_all_tabs_then_reopening() {
    let backend = MockBackend::default();
    let mut app = loaded_app(&backend);
    app.open_tab(&TabData::new("shop", "users"));
    app.after_render(editor_area());

    key(&mut app, KeyCode::Char('w'), KeyModifiers::CONTROL);
    app.after_render(editor_area());
    assert!(app.tabs.is_empty());
    assert!(!app.tabs.has_editor());
    assert_eq!(app.results.bound_tab(), None);

    app.open_tab(&TabData::new("shop", "orders"));
    assert!(app.after_render(editor_area()));
    assert_eq!(
        app.tabs.editor().unwrap().value(),
        "SELECT * FROM shop.orders;"
    );
}

/// Type a command into the command bar and submit it
fn run(app: &mut App, cmd: &str) -> Action {
    key(app, KeyCode::Char('p'), KeyModifiers::CONTROL);
    app.handle_event(AppEvent::Paste(cmd.to_string())).unwrap();
    press(app, KeyCode::Enter)
}

#[test]
fn test_command_bar_drives_tabs() {
    let backend = MockBackend::default();
    let mut app = loaded_app(&backend);

    run(&mut app, "/open shop.users");
    run(&mut app, "/open shop.orders");
    app.after_render(editor_area());
    assert_eq!(app.tabs.tab_count(), 2);

    run(&mut app, "/tab 1");
    assert_eq!(app.tabs.current_tab_id(), "shop.users");

    let action = run(&mut app, "/exec");
    assert!(matches!(action, Action::ExecuteQuery(ref r) if r.tab_id == "shop.users"));
    run_action(&mut app, &backend, action);

    run(&mut app, "/close");
    assert_eq!(app.tabs.tab_count(), 1);
    assert_eq!(app.tabs.current_tab_id(), "shop.orders");

    assert_eq!(run(&mut app, "/refresh"), Action::LoadDatabases);
}

#[test]
fn test_copy_without_results_is_harmless() {
    let backend = MockBackend::default();
    let mut app = loaded_app(&backend);
    app.focus = PanelFocus::Results;
    assert_eq!(press(&mut app, KeyCode::Char('y')), Action::None);
}
