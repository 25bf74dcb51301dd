//! Common test utilities and helpers
//!
//! Shared fixtures and an in-memory [`Backend`] for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use sqltabs::app::{Action, App, AppEvent};
use sqltabs::backend::{Backend, CellValue, DatabaseEntry, QueryResults, Row};
use sqltabs::error::{BackendError, BackendResult};
use std::sync::Mutex;
use std::time::Duration;

/// Standard database listing for consistent testing
pub fn test_databases() -> Vec<DatabaseEntry> {
    vec![
        DatabaseEntry {
            name: "shop".to_string(),
            tables: vec!["orders".to_string(), "users".to_string()],
        },
        DatabaseEntry {
            name: "analytics".to_string(),
            tables: vec!["events".to_string()],
        },
    ]
}

/// Two-column result set
pub fn test_results() -> QueryResults {
    QueryResults::new(
        vec!["id".to_string(), "name".to_string()],
        vec![
            Row {
                values: vec![CellValue::Integer(1), CellValue::Text("Alice".to_string())],
            },
            Row {
                values: vec![CellValue::Integer(2), CellValue::Null],
            },
        ],
        Duration::from_millis(4),
    )
}

/// Backend answering from memory; records every query it receives
#[derive(Default)]
pub struct MockBackend {
    pub fail_queries_with: Option<String>,
    pub executed: Mutex<Vec<(String, String)>>,
}

impl MockBackend {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_queries_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn executed(&self) -> Vec<(String, String)> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_databases(&self) -> BackendResult<Vec<DatabaseEntry>> {
        Ok(test_databases())
    }

    async fn execute_query(&self, database: &str, sql: &str) -> BackendResult<QueryResults> {
        self.executed
            .lock()
            .unwrap()
            .push((database.to_string(), sql.to_string()));
        match &self.fail_queries_with {
            Some(message) => Err(BackendError::Status {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(test_results()),
        }
    }
}

/// Run an action the way the event loop does, synchronously, and feed the
/// resulting event back into the app.
pub fn run_action(app: &mut App, backend: &dyn Backend, action: Action) -> Action {
    let event = match action {
        Action::LoadDatabases => match tokio_test::block_on(backend.list_databases()) {
            Ok(dbs) => AppEvent::DatabasesLoaded(dbs),
            Err(e) => AppEvent::DatabasesFailed(e.to_string()),
        },
        Action::ExecuteQuery(request) => {
            match tokio_test::block_on(backend.execute_query(&request.database, &request.sql)) {
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
            }
        }
        other => return other,
    };
    app.handle_event(event).unwrap()
}
