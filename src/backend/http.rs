//! HTTP implementation of [`Backend`]
//!
//! Talks JSON to the database API:
//! - `GET  {api_url}/databases`
//! - `POST {api_url}/query` with `{ "dbName": .., "query": .. }`

use crate::backend::provider::Backend;
use crate::backend::types::{self, DatabaseEntry, QueryResults};
use crate::config::BackendSettings;
use crate::error::{BackendError, BackendResult};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

const DATABASES_PATH: &str = "databases";
const QUERY_PATH: &str = "query";

/// Body of `POST /query`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    db_name: &'a str,
    query: &'a str,
}

/// reqwest-backed API client
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    /// Base URL, always ending in `/` so `join` appends instead of replacing
    base_url: Url,
}

impl HttpBackend {
    /// Build a client for `settings.api_url`
    ///
    /// # Errors
    /// Returns `BackendError::InvalidUrl` if the URL does not parse or is not http(s).
    pub fn new(settings: &BackendSettings) -> BackendResult<Self> {
        let base_url = parse_base_url(&settings.api_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// The normalized base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

fn parse_base_url(raw: &str) -> BackendResult<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let mut url = Url::parse(trimmed).map_err(|e| BackendError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BackendError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    let path = format!("{}/", url.path().trim_end_matches('/'));
    url.set_path(&path);
    Ok(url)
}

/// Turn a non-success response into `BackendError::Status`, preferring the
/// server's own `message`/`error` field over the raw body.
async fn error_for_status(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            ["message", "error", "sqlMessage"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(String::from))
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        });
    tracing::warn!(status = status.as_u16(), %message, "backend request failed");
    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_databases(&self) -> BackendResult<Vec<DatabaseEntry>> {
        let url = self.endpoint(DATABASES_PATH)?;
        tracing::debug!(%url, "listing databases");
        let response = self.client.get(url).send().await?;
        let body: Value = error_for_status(response).await?.json().await?;
        let databases = types::databases_from_json(body)?;
        tracing::info!(count = databases.len(), "databases loaded");
        Ok(databases)
    }

    async fn execute_query(&self, database: &str, sql: &str) -> BackendResult<QueryResults> {
        let url = self.endpoint(QUERY_PATH)?;
        tracing::debug!(%url, database, "executing query");
        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .json(&QueryRequest {
                db_name: database,
                query: sql,
            })
            .send()
            .await?;
        let body: Value = error_for_status(response).await?.json().await?;
        let results = QueryResults::from_json(body, started.elapsed())?;
        tracing::info!(
            database,
            rows = results.row_count,
            elapsed_ms = results.execution_time.as_millis() as u64,
            "query finished"
        );
        Ok(results)
    }
}
