//! Backend trait
//!
//! Defines the interface to the remote database API.

use crate::backend::types::{DatabaseEntry, QueryResults};
use crate::error::BackendResult;
use async_trait::async_trait;

/// Access to the database API
///
/// Implementations must be cheap to share across spawned tasks.
#[async_trait]
pub trait Backend: Send + Sync {
    /// List the databases visible to the API user
    ///
    /// # Errors
    /// Returns `BackendError::Status` when the server rejects the request and
    /// `BackendError::Request`/`Timeout` when it cannot be reached.
    async fn list_databases(&self) -> BackendResult<Vec<DatabaseEntry>>;

    /// Run `sql` against `database` and return its rows
    ///
    /// # Errors
    /// Returns `BackendError::Status` with the server's message when the
    /// statement fails.
    async fn execute_query(&self, database: &str, sql: &str) -> BackendResult<QueryResults>;
}
