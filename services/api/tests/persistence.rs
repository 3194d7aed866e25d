//! End-to-end checks against a file-backed database and a real upload directory.

use api_lib::adapters::{DbAdapter, LocalFileStorage};
use api_lib::config::Config;
use api_lib::web::{router, state::AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

async fn app_at(dir: &Path) -> Router {
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some(format!("sqlite://{}", dir.join("app.db").display())),
        "UPLOAD_DIR" => Some(dir.join("uploads").display().to_string()),
        _ => None,
    })
    .unwrap();

    let db = DbAdapter::connect(&config.database_url).await.unwrap();
    db.run_migrations().await.unwrap();
    let storage = LocalFileStorage::new(&config.upload_dir);
    storage.ensure_root().await.unwrap();

    router(Arc::new(AppState {
        db: Arc::new(db),
        storage: Arc::new(storage),
        config: Arc::new(config),
    }))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn records_and_files_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let payload = b"line one\nline two\n".to_vec();

    {
        let app = app_at(dir.path()).await;
        let (status, _) = call(
            &app,
            json_post(
                "/projects",
                json!({"name": "Capstone", "description": "solar farm"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let mut body = b"--B\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\r\n".to_vec();
        body.extend_from_slice(&payload);
        body.extend_from_slice(b"\r\n--B--\r\n");
        let request = Request::builder()
            .method("POST")
            .uri("/projects/1/documents")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=B")
            .body(Body::from(body))
            .unwrap();
        let (status, _) = call(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let app = app_at(dir.path()).await;
    let (_, projects) = call(&app, get("/projects")).await;
    assert_eq!(projects[0]["name"], "Capstone");
    assert_eq!(projects[0]["description"], "solar farm");

    let (_, documents) = call(&app, get("/projects/1/documents")).await;
    assert_eq!(documents.as_array().unwrap().len(), 1);
    let stored = documents[0]["path"].as_str().unwrap();
    assert!(Path::new(stored).starts_with(dir.path().join("uploads").join("1")));
    assert_eq!(std::fs::read(stored).unwrap(), payload);

    let (status, _) = call(&app, json_post("/projects", json!({"name": "second"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, projects) = call(&app, get("/projects")).await;
    assert_eq!(projects[0]["id"], 2);
    assert_eq!(projects[1]["id"], 1);
}
