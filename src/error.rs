//! Error types for sqltabs
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors with clear error chains.

use std::io;

/// Main error type for the sqltabs application
#[derive(Debug, thiserror::Error)]
pub enum SqlTabsError {
    /// Database API errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Command parsing errors
    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Errors talking to the database HTTP API
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The configured API URL is unusable
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure (DNS, refused connection, TLS, ...)
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have a shape we understand
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Request(err.to_string())
        }
    }
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config/data directory not found
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// Config file could not be read
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Command parsing and execution errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Unknown command
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// Missing required argument
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for sqltabs operations
pub type Result<T> = std::result::Result<T, SqlTabsError>;

/// Specialized Result type for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized Result type for command operations
pub type CommandResult<T> = std::result::Result<T, CommandError>;
