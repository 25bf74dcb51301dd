//! Backend data types
//!
//! Database listings and query results as returned by the HTTP API, plus the
//! lenient decoding that turns the API's JSON into them.

use crate::error::{BackendError, BackendResult};
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// A database and the tables the API reported for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEntry {
    pub name: String,
    pub tables: Vec<String>,
}

/// Query execution results
#[derive(Debug, Clone)]
pub struct QueryResults {
    /// Column names in display order
    pub columns: Vec<String>,
    /// Result rows
    pub rows: Vec<Row>,
    /// Total row count
    pub row_count: usize,
    /// Set for statements that modify data instead of returning rows
    pub affected_rows: Option<u64>,
    /// Round-trip time measured by the client
    pub execution_time: Duration,
    /// When the response arrived
    pub executed_at: DateTime<Local>,
}

/// A single row of query results
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub values: Vec<CellValue>,
}

/// A cell value (single column value in a row)
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    /// Nested arrays/objects (JSON columns)
    Json(Value),
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Integer(i),
                None => n
                    .as_f64()
                    .map(CellValue::Float)
                    .unwrap_or_else(|| CellValue::Text(n.to_string())),
            },
            Value::String(s) => CellValue::Text(s),
            other => CellValue::Json(other),
        }
    }
}

impl CellValue {
    /// Get a display string for this cell value (truncated to `max_chars`)
    pub fn display_string(&self, max_chars: usize) -> String {
        let full = match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.replace('\n', "\u{21b5}"),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Json(v) => v.to_string(),
        };

        if full.chars().count() > max_chars {
            let kept: String = full.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{}...", kept)
        } else {
            full
        }
    }

    /// Check if this is a NULL value
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl QueryResults {
    pub fn new(columns: Vec<String>, rows: Vec<Row>, execution_time: Duration) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            affected_rows: None,
            execution_time,
            executed_at: Local::now(),
        }
    }

    /// Result of a statement that changed rows but returned none
    pub fn affected(count: u64, execution_time: Duration) -> Self {
        Self {
            affected_rows: Some(count),
            ..Self::new(Vec::new(), Vec::new(), execution_time)
        }
    }

    /// Decode a `/query` response body.
    ///
    /// Accepts an array of row objects, an array of scalars, an object with
    /// `rows` (and optionally `columns`/`fields`), or an object with
    /// `affectedRows`.
    pub fn from_json(body: Value, execution_time: Duration) -> BackendResult<Self> {
        match body {
            Value::Array(items) => Ok(rows_from_items(items, None, execution_time)),
            Value::Object(mut map) => {
                if let Some(rows) = map.remove("rows") {
                    let Value::Array(items) = rows else {
                        return Err(BackendError::Decode("`rows` is not an array".into()));
                    };
                    let names = map
                        .remove("columns")
                        .or_else(|| map.remove("fields"))
                        .map(column_names)
                        .transpose()?;
                    return Ok(rows_from_items(items, names, execution_time));
                }
                if let Some(count) = map.get("affectedRows").and_then(Value::as_u64) {
                    return Ok(Self::affected(count, execution_time));
                }
                Err(BackendError::Decode(
                    "expected rows or affectedRows in query response".into(),
                ))
            }
            other => Err(BackendError::Decode(format!(
                "expected an array or object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn rows_from_items(
    items: Vec<Value>,
    names: Option<Vec<String>>,
    execution_time: Duration,
) -> QueryResults {
    if items.iter().all(Value::is_object) {
        let mut columns = names.unwrap_or_default();
        for item in &items {
            if let Value::Object(map) = item {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
        }
        let rows = items
            .into_iter()
            .map(|item| {
                let Value::Object(mut map) = item else {
                    return Row { values: Vec::new() };
                };
                Row {
                    values: columns
                        .iter()
                        .map(|c| map.remove(c).map(CellValue::from).unwrap_or(CellValue::Null))
                        .collect(),
                }
            })
            .collect();
        return QueryResults::new(columns, rows, execution_time);
    }

    if items.iter().all(Value::is_array) {
        let width = items
            .iter()
            .filter_map(Value::as_array)
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        let mut columns = names.unwrap_or_default();
        while columns.len() < width {
            columns.push(format!("col{}", columns.len() + 1));
        }
        let rows = items
            .into_iter()
            .map(|item| {
                let mut values: Vec<CellValue> = match item {
                    Value::Array(cells) => cells.into_iter().map(CellValue::from).collect(),
                    _ => Vec::new(),
                };
                values.resize(columns.len(), CellValue::Null);
                Row { values }
            })
            .collect();
        return QueryResults::new(columns, rows, execution_time);
    }

    let rows = items
        .into_iter()
        .map(|v| Row {
            values: vec![CellValue::from(v)],
        })
        .collect();
    QueryResults::new(vec!["value".to_string()], rows, execution_time)
}

/// Column names from a `columns`/`fields` array of strings or `{ "name": .. }` objects
fn column_names(value: Value) -> BackendResult<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(BackendError::Decode("column list is not an array".into()));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            Value::Object(mut map) => match map.remove("name") {
                Some(Value::String(s)) => Ok(s),
                _ => Err(BackendError::Decode("column entry without a name".into())),
            },
            other => Err(BackendError::Decode(format!(
                "unexpected column entry: {}",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── /databases payload ───────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDatabaseList {
    List(Vec<RawDatabase>),
    Wrapped { databases: Vec<RawDatabase> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDatabase {
    Name(String),
    Object {
        #[serde(alias = "Database", alias = "database", alias = "dbName")]
        name: String,
        #[serde(default)]
        tables: Vec<RawTable>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTable {
    Name(String),
    Object {
        #[serde(alias = "tableName", alias = "table_name")]
        name: String,
    },
}

/// Decode a `/databases` response body
pub fn databases_from_json(body: Value) -> BackendResult<Vec<DatabaseEntry>> {
    let raw: RawDatabaseList = serde_json::from_value(body)
        .map_err(|e| BackendError::Decode(format!("database list: {}", e)))?;
    let list = match raw {
        RawDatabaseList::List(list) | RawDatabaseList::Wrapped { databases: list } => list,
    };
    Ok(list
        .into_iter()
        .map(|db| match db {
            RawDatabase::Name(name) => DatabaseEntry {
                name,
                tables: Vec::new(),
            },
            RawDatabase::Object { name, tables } => DatabaseEntry {
                name,
                tables: tables
                    .into_iter()
                    .map(|t| match t {
                        RawTable::Name(n) | RawTable::Object { name: n } => n,
                    })
                    .collect(),
            },
        })
        .collect())
}
