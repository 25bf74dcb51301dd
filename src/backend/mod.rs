//! Database API access
//!
//! The UI never talks HTTP directly. It goes through the [`Backend`] trait so
//! the event loop can hold any implementation and tests can use mocks.

pub mod http;
pub mod provider;
pub mod types;

// Re-export main types
pub use http::HttpBackend;
pub use provider::Backend;
pub use types::{CellValue, DatabaseEntry, QueryResults, Row};
