//! sqltabs - A keyboard-driven, tabbed SQL workbench for the terminal
//!
//! sqltabs lists the databases and tables exposed by an HTTP database API and
//! opens one query tab per table. Each tab keeps its own SQL buffer; a single
//! editor widget is shared between tabs and swaps buffers on selection.
//!
//! # Features
//!
//! - **Database Browser**: Databases and their tables, fetched from `GET /databases`
//! - **Query Tabs**: One tab per `db.table`, opened with a default `SELECT *`
//! - **Query Editor**: Multi-line editing with SQL highlighting and formatting
//! - **Results Grid**: Per-tab results with cell navigation and clipboard copy
//! - **Keyboard-First**: All operations accessible via keyboard shortcuts
//!
//! # Architecture
//!
//! - [`config`]: Settings file and environment overrides
//! - [`backend`]: The database API client and its data types
//! - [`tabs`]: Tab list, per-tab buffers and the shared editor lifecycle
//! - [`ui`]: Terminal user interface components
//! - [`commands`]: Command parsing for the command bar
//! - [`keymap`]: Key bindings per panel
//! - [`logging`]: File-based tracing setup
//! - [`error`]: Error types and result aliases
//! - [`app`]: Application state and event handling
//!
//! # Example
//!
//! ```no_run
//! use sqltabs::backend::{Backend, HttpBackend};
//! use sqltabs::config::Settings;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default();
//! let backend = HttpBackend::new(&settings.backend)?;
//!
//! for db in backend.list_databases().await? {
//!     println!("{} ({} tables)", db.name, db.tables.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod keymap;
pub mod logging;
pub mod tabs;
pub mod ui;

pub use error::{BackendError, CommandError, ConfigError, Result, SqlTabsError};
