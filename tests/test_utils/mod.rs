//! Test utilities for integration tests
use std::sync::Arc;

use axum::{Router, body::Body};
use tempfile::TempDir;

use mailgraph::api::AppState;
use mailgraph::api::app;
use mailgraph::core::AppConfig;
use mailgraph::core::db::{async_db, initialize_db};
use mailgraph::mail::import::{import_dataset, load_dataset};

/// Creates a test application router backed by a fresh database in
/// a temporary directory, seeded with `tests/data/dataset.json`.
///
/// The directory is deleted when the returned `TempDir` is dropped so
/// keep it alive for the duration of the test.
pub async fn test_app() -> (Router, TempDir) {
    let dir = tempfile::Builder::new()
        .prefix("mailgraph-test")
        .tempdir()
        .expect("Failed to create temp directory");

    let db_path = dir.path().join("db");
    std::fs::create_dir_all(&db_path).expect("Failed to create db directory");
    let db_path = db_path.to_str().unwrap().to_string();

    let db = async_db(&db_path)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to initialize db");
        Ok(())
    })
    .await
    .unwrap();

    let dataset = load_dataset("./tests/data/dataset.json").expect("Failed to load dataset");
    import_dataset(&db, dataset)
        .await
        .expect("Failed to import dataset");

    let app_config = AppConfig {
        storage_path: dir.path().display().to_string(),
        db_path,
        static_path: dir.path().join("static").display().to_string(),
    };
    let app_state = AppState::new(db, app_config);
    (app(Arc::new(app_state)), dir)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf8")
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).expect("Body is not json")
}

/// Build a query string from key/value pairs
#[allow(dead_code)]
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<String>>()
        .join("&")
}

/// Query string for the filter endpoints with the given overrides
/// and every other required key present but empty.
#[allow(dead_code)]
pub fn filter_query(overrides: &[(&str, &str)]) -> String {
    let pairs: Vec<(&str, &str)> = ["start_date", "end_date", "subject", "from", "to", "limit"]
        .into_iter()
        .map(|name| {
            let value = overrides
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| *v)
                .unwrap_or("");
            (name, value)
        })
        .collect();
    query_string(&pairs)
}
