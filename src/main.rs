//! sqltabs - A keyboard-driven, tabbed SQL workbench for the terminal
//!
//! This is the main entry point for the sqltabs application.
//! The actual logic is in the library modules for better testability.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use sqltabs::app::{Action, App, AppEvent};
use sqltabs::backend::{Backend, HttpBackend};
use sqltabs::config::Settings;
use sqltabs::tabs::TabData;
use sqltabs::ui::render::render;
use std::collections::HashMap;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Keyboard-driven, tabbed SQL workbench backed by a database HTTP API
#[derive(Parser, Debug)]
#[command(name = "sqltabs", version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the database API (overrides config and SQLTABS_API_URL)
    #[arg(short = 'u', long)]
    api_url: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Tables to open on startup, as db.table
    tables: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())
        .context("failed to load settings")?
        .with_env_overrides(cli.api_url.clone());
    if let Some(file) = cli.log_file {
        settings.logging.file = Some(file);
    }
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    settings.validate().context("invalid settings")?;

    sqltabs::logging::init(&settings).context("failed to initialize logging")?;

    let backend: Arc<dyn Backend> =
        Arc::new(HttpBackend::new(&settings.backend).context("failed to create API client")?);
    tracing::info!(api_url = %settings.backend.api_url, "starting");

    let mut app = App::new_with_settings(&settings);
    for table in &cli.tables {
        match TabData::parse(table) {
            Some(data) => app.open_tab(&data),
            None => tracing::warn!(table = %table, "ignoring startup table, expected db.table"),
        }
    }

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app, backend).await;
    restore_terminal(&mut terminal)?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Restore the terminal before the default hook prints the panic
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
        default_hook(info);
    }));
}

/// Draw a frame and run the post-render hook. Draws once more if the hook
/// created the editor so it shows up immediately.
fn draw(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut layout = None;
    terminal.draw(|frame| layout = Some(render(frame, app)))?;
    if let Some(layout) = layout
        && app.after_render(layout.editor)
    {
        terminal.draw(|frame| {
            render(frame, app);
        })?;
    }
    Ok(())
}

/// In-flight query tasks by tab id, with the run id each one serves
type RunningQueries = HashMap<String, (u64, JoinHandle<()>)>;

async fn run(terminal: &mut Tui, app: &mut App, backend: Arc<dyn Backend>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut events = EventStream::new();
    let mut queries = RunningQueries::new();

    dispatch(Action::LoadDatabases, app, &backend, &tx, &mut queries);

    while app.running {
        draw(terminal, app)?;

        let event = tokio::select! {
            maybe = events.next() => match maybe {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Some(Ok(Event::Paste(data))) => AppEvent::Paste(data),
                Some(Ok(Event::Resize(_, _))) => AppEvent::Resize,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    return Err(anyhow::Error::new(e).context("terminal event stream failed"));
                }
                None => break,
            },
            Some(event) = rx.recv() => event,
        };

        if let AppEvent::QueryCompleted { ref tab_id, run_id, .. }
        | AppEvent::QueryFailed { ref tab_id, run_id, .. } = event
            && queries.get(tab_id).is_some_and(|(id, _)| *id == run_id)
        {
            queries.remove(tab_id);
        }
        let action = app.handle_event(event)?;
        dispatch(action, app, &backend, &tx, &mut queries);
    }

    for (_, (_, handle)) in queries.drain() {
        handle.abort();
    }
    Ok(())
}

/// Carry out an action returned by the app
fn dispatch(
    action: Action,
    app: &mut App,
    backend: &Arc<dyn Backend>,
    tx: &mpsc::UnboundedSender<AppEvent>,
    queries: &mut RunningQueries,
) {
    match action {
        Action::None => {}
        Action::Quit => app.running = false,
        Action::LoadDatabases => {
            app.browser.set_loading();
            let backend = Arc::clone(backend);
            let tx = tx.clone();
            tokio::spawn(async move {
                let event = match backend.list_databases().await {
                    Ok(databases) => AppEvent::DatabasesLoaded(databases),
                    Err(e) => {
                        tracing::warn!(error = %e, "listing databases failed");
                        AppEvent::DatabasesFailed(e.to_string())
                    }
                };
                let _ = tx.send(event);
            });
        }
        Action::ExecuteQuery(request) => {
            let backend = Arc::clone(backend);
            let tx = tx.clone();
            let tab_id = request.tab_id.clone();
            let run_id = request.run_id;
            let handle = tokio::spawn(async move {
                tracing::debug!(tab = %request.tab_id, db = %request.database, "executing query");
                let event = match backend.execute_query(&request.database, &request.sql).await {
                    Ok(results) => AppEvent::QueryCompleted {
                        tab_id: request.tab_id,
                        run_id: request.run_id,
                        results,
                    },
                    Err(e) => AppEvent::QueryFailed {
                        tab_id: request.tab_id,
                        run_id: request.run_id,
                        error: e.to_string(),
                    },
                };
                let _ = tx.send(event);
            });
            if let Some((_, previous)) = queries.insert(tab_id, (run_id, handle)) {
                previous.abort();
            }
        }
        Action::CancelQuery { tab_id } => {
            if let Some((run_id, handle)) = queries.remove(&tab_id) {
                tracing::info!(tab = %tab_id, run_id, "cancelling query");
                handle.abort();
            }
        }
    }
}
