//! User settings and preferences
//!
//! Manages application settings stored in `<config dir>/sqltabs/config.toml`.
//! Every field has a default, so a missing file or a partial file is fine.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `backend.api_url`
pub const API_URL_ENV: &str = "SQLTABS_API_URL";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub editor: EditorSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the database API lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Options handed to the editor widget when it is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default = "default_true")]
    pub line_numbers: bool,

    #[serde(default = "default_true")]
    pub smart_indent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Maximum number of open tabs (0 = unlimited)
    #[serde(default = "default_max_tabs")]
    pub max_tabs: usize,

    /// Width of the database browser column
    #[serde(default = "default_browser_width")]
    pub browser_width: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path; defaults to `<data dir>/sqltabs/sqltabs.log`
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_api_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_max_tabs() -> usize {
    20
}

fn default_browser_width() -> u16 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            line_numbers: default_true(),
            smart_indent: default_true(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            max_tabs: default_max_tabs(),
            browser_width: default_browser_width(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Settings {
    /// Directory holding `config.toml`
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("sqltabs"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load settings.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let settings = match path {
            Some(p) => Self::load_from(p)?,
            None => {
                let default_path = Self::config_dir()?.join("config.toml");
                if default_path.exists() {
                    Self::load_from(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        let settings = settings.with_env_overrides(std::env::var(API_URL_ENV).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a settings file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply the `SQLTABS_API_URL` override (passed in so tests don't touch the process env)
    pub fn with_env_overrides(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.backend.api_url = url;
        }
        self
    }

    /// Reject values that can never work
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.api_url is empty".into()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "backend.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.ui.browser_width < 10 {
            return Err(ConfigError::Invalid(
                "ui.browser_width must be at least 10".into(),
            ));
        }
        Ok(())
    }

    /// Log file location, falling back to the platform data directory
    pub fn log_file(&self) -> ConfigResult<PathBuf> {
        if let Some(ref file) = self.logging.file {
            return Ok(file.clone());
        }
        dirs::data_local_dir()
            .map(|d| d.join("sqltabs").join("sqltabs.log"))
            .ok_or(ConfigError::NoConfigDir)
    }
}
