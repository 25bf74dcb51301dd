//! Integration tests for HttpBackend against a mock API server

use serde_json::json;
use sqltabs::backend::{Backend, CellValue, HttpBackend};
use sqltabs::config::BackendSettings;
use sqltabs::error::BackendError;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer, prefix: &str) -> HttpBackend {
    HttpBackend::new(&BackendSettings {
        api_url: format!("{}{}", server.uri(), prefix),
        timeout_secs: 2,
    })
    .unwrap()
}

#[tokio::test]
async fn test_list_databases() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/databases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "shop", "tables": ["orders", "users"] },
            { "name": "analytics", "tables": [] }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, "/api");
    let dbs = backend.list_databases().await.unwrap();

    assert_eq!(dbs.len(), 2);
    assert_eq!(dbs[0].name, "shop");
    assert_eq!(dbs[0].tables, vec!["orders", "users"]);
    assert!(dbs[1].tables.is_empty());
}

#[tokio::test]
async fn test_list_databases_with_trailing_slash_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/databases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["shop"])))
        .mount(&server)
        .await;

    let backend = backend_for(&server, "/api/");
    let dbs = backend.list_databases().await.unwrap();
    assert_eq!(dbs[0].name, "shop");
}

#[tokio::test]
async fn test_list_databases_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/databases"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Access denied" })),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server, "/api");
    let err = backend.list_databases().await.unwrap_err();

    match err {
        BackendError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Access denied");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_databases_plain_text_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/databases"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway\n"))
        .mount(&server)
        .await;

    let err = backend_for(&server, "/api")
        .list_databases()
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Server returned 502: Bad gateway");
}

#[tokio::test]
async fn test_list_databases_unexpected_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/databases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let err = backend_for(&server, "/api")
        .list_databases()
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_execute_query_posts_db_and_sql() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_json(json!({
            "dbName": "shop",
            "query": "SELECT * FROM shop.users;"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Alice", "active": true },
            { "id": 2, "name": null, "active": false }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, "/api");
    let results = backend
        .execute_query("shop", "SELECT * FROM shop.users;")
        .await
        .unwrap();

    assert_eq!(results.columns, vec!["id", "name", "active"]);
    assert_eq!(results.row_count, 2);
    assert_eq!(results.rows[0].values[1], CellValue::Text("Alice".into()));
    assert!(results.rows[1].values[1].is_null());
    assert_eq!(results.rows[1].values[2], CellValue::Boolean(false));
}

#[tokio::test]
async fn test_execute_query_affected_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "affectedRows": 4, "insertId": 0 })),
        )
        .mount(&server)
        .await;

    let results = backend_for(&server, "/api")
        .execute_query("shop", "DELETE FROM users WHERE active = 0")
        .await
        .unwrap();
    assert_eq!(results.affected_rows, Some(4));
    assert!(results.rows.is_empty());
}

#[tokio::test]
async fn test_execute_query_sql_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "ER_BAD_FIELD_ERROR",
            "sqlMessage": "Unknown column 'nme' in 'field list'"
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server, "/api")
        .execute_query("shop", "SELECT nme FROM users")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Server returned 400: Unknown column 'nme' in 'field list'"
    );
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&BackendSettings {
        api_url: format!("{}/api", server.uri()),
        timeout_secs: 1,
    })
    .unwrap();
    let err = backend.execute_query("shop", "SELECT 1").await.unwrap_err();
    assert!(matches!(err, BackendError::Timeout));
}

#[tokio::test]
async fn test_unreachable_server() {
    let backend = HttpBackend::new(&BackendSettings {
        api_url: "http://127.0.0.1:9/api".to_string(),
        timeout_secs: 2,
    })
    .unwrap();
    let err = backend.list_databases().await.unwrap_err();
    assert!(matches!(
        err,
        BackendError::Request(_) | BackendError::Timeout
    ));
}
