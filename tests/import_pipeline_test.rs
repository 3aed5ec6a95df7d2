use anyhow::Result;
use csv_sql_import::core::event::validate_trigger;
use csv_sql_import::core::writer::{ENSURE_TABLE_SQL, INSERT_SQL};
use csv_sql_import::core::SqlExecutor;
use csv_sql_import::{CosObjectStore, CsvImportPipeline, ImportEngine, RecordWriter};
use httpmock::prelude::*;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct MockExecutor {
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockExecutor {
    fn new() -> Self {
        Self::default()
    }

    async fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().await.clone()
    }
}

impl SqlExecutor for MockExecutor {
    async fn execute(
        &self,
        statement: &str,
        params: &[&str],
    ) -> csv_sql_import::Result<u64> {
        let mut calls = self.calls.lock().await;
        calls.push((
            statement.to_string(),
            params.iter().map(|p| p.to_string()).collect(),
        ));
        Ok(1)
    }
}

fn event_json(operation: &str, key: &str) -> String {
    serde_json::json!({
        "operation": operation,
        "bucket": "b1",
        "key": key,
        "notification": { "content_type": "text/csv" }
    })
    .to_string()
}

fn bindings_json() -> String {
    serde_json::json!({
        "cloud-object-storage": [{
            "credentials": {
                "apikey": "test-apikey",
                "resource_instance_id": "crn:v1:test::"
            }
        }]
    })
    .to_string()
}

fn mock_token_endpoint(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/identity/token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "access_token": "bearer-123" }));
    })
}

#[tokio::test]
async fn test_end_to_end_import_of_two_row_csv() -> Result<()> {
    let server = MockServer::start();
    mock_token_endpoint(&server);
    let object_mock = server.mock(|when, then| {
        when.method(GET).path("/b1/users.csv");
        then.status(200)
            .body("Firstname,Lastname\nAda,Lovelace\nAlan,Turing\n");
    });

    let (event, credentials) =
        validate_trigger(Some(&event_json("Object:Write", "users.csv")), Some(&bindings_json()))?;

    let executor = MockExecutor::new();
    let store = CosObjectStore::new(server.url("/identity/token"), server.url(""), credentials);
    let pipeline =
        CsvImportPipeline::new(store, RecordWriter::new(executor.clone(), false), &event);

    let report = ImportEngine::new(pipeline).run().await?;

    object_mock.assert();
    assert_eq!(report.total, 2);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.failed, 0);

    let calls = executor.calls().await;
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].0, ENSURE_TABLE_SQL);
    assert_eq!(
        calls[1],
        (INSERT_SQL.to_string(), vec!["Ada".to_string(), "Lovelace".to_string()])
    );
    assert_eq!(
        calls[2],
        (INSERT_SQL.to_string(), vec!["Alan".to_string(), "Turing".to_string()])
    );
    Ok(())
}

#[tokio::test]
async fn test_rejected_event_makes_no_network_call() {
    let server = MockServer::start();
    let token_mock = mock_token_endpoint(&server);
    let object_mock = server.mock(|when, then| {
        when.method(GET).path("/b1/users.csv");
        then.status(200).body("Firstname,Lastname\n");
    });

    let result = validate_trigger(
        Some(&event_json("Object:Delete", "users.csv")),
        Some(&bindings_json()),
    );

    assert!(result.is_err());
    token_mock.assert_hits(0);
    object_mock.assert_hits(0);
}

#[tokio::test]
async fn test_empty_csv_object_imports_zero_records() -> Result<()> {
    let server = MockServer::start();
    mock_token_endpoint(&server);
    server.mock(|when, then| {
        when.method(GET).path("/b1/empty.csv");
        then.status(200).body("");
    });

    let (event, credentials) =
        validate_trigger(Some(&event_json("Object:Write", "empty.csv")), Some(&bindings_json()))?;

    let executor = MockExecutor::new();
    let store = CosObjectStore::new(server.url("/identity/token"), server.url(""), credentials);
    let pipeline =
        CsvImportPipeline::new(store, RecordWriter::new(executor.clone(), false), &event);

    let report = ImportEngine::new(pipeline).run().await?;

    assert_eq!(report.total, 0);
    // The table is still ensured even when there is nothing to insert.
    let calls = executor.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ENSURE_TABLE_SQL);
    Ok(())
}

#[tokio::test]
async fn test_fetch_failure_aborts_before_any_database_work() -> Result<()> {
    let server = MockServer::start();
    mock_token_endpoint(&server);
    server.mock(|when, then| {
        when.method(GET).path("/b1/gone.csv");
        then.status(404);
    });

    let (event, credentials) =
        validate_trigger(Some(&event_json("Object:Write", "gone.csv")), Some(&bindings_json()))?;

    let executor = MockExecutor::new();
    let store = CosObjectStore::new(server.url("/identity/token"), server.url(""), credentials);
    let pipeline =
        CsvImportPipeline::new(store, RecordWriter::new(executor.clone(), false), &event);

    let result = ImportEngine::new(pipeline).run().await;

    assert!(result.is_err());
    assert!(executor.calls().await.is_empty());
    Ok(())
}
