//! Logging setup
//!
//! The terminal belongs to the UI, so tracing output goes to a log file.
//! `RUST_LOG` takes precedence over the configured level.

use crate::config::Settings;
use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` if set, otherwise `level` for this crate
/// and warnings for everything else.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,sqltabs={}", level)))
}

/// Install the global subscriber writing to the configured log file.
/// Returns the path being written to.
pub fn init(settings: &Settings) -> Result<PathBuf> {
    let path = settings.log_file()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    // A second init (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&settings.logging.level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(path)
}
