//! Configuration management
//!
//! Handles loading user settings from `config.toml` and environment overrides.

pub mod settings;

pub use settings::{BackendSettings, EditorSettings, LoggingSettings, Settings, UiSettings};
